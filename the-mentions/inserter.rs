//! Committing a chosen suggestion into the buffer.

use the_core::text::{
  char_len,
  is_blank,
};

use crate::{
  host::MentionHost,
  mention::{
    Mention,
    MentionError,
    Result,
  },
  reconciler::{
    Edit,
    MentionReconciler,
  },
  scanner,
};

/// Replaces the active query with a mention name and registers it.
///
/// The query span runs from the trigger opening the word before the caret
/// up to the caret. It becomes `"<name> "`, the name is highlighted, and a
/// mention covering exactly the name is registered.
pub struct MentionInserter<'a, H: MentionHost> {
  host:       &'a mut H,
  reconciler: &'a mut MentionReconciler,
  style:      &'a H::Style,
}

impl<'a, H: MentionHost> MentionInserter<'a, H> {
  pub fn new(host: &'a mut H, reconciler: &'a mut MentionReconciler, style: &'a H::Style) -> Self {
    Self {
      host,
      reconciler,
      style,
    }
  }

  /// Insert `mention` at the active query and return the registered value.
  ///
  /// Only the name of `mention` is used: its offset and length are derived
  /// from where it lands. Without a trigger before the caret the name is
  /// inserted at the caret.
  pub fn insert(self, mention: Option<Mention>) -> Result<Mention> {
    let mention = mention.ok_or(MentionError::MissingMention)?;
    if is_blank(&mention.name) {
      return Err(MentionError::BlankName);
    }

    let text = self.host.text();
    let caret = self.host.caret().min(text.len_chars());
    let start = scanner::trigger_before(text, caret).unwrap_or(caret);
    let removed = caret - start;

    let name_len = char_len(&mention.name);
    let replacement = format!("{} ", mention.name);
    self.host.replace_range(start, removed, &replacement);
    self
      .reconciler
      .reconcile(Edit::replace(start, removed, name_len + 1));
    self.host.set_caret(start + name_len + 1);
    self.host.highlight(start, name_len, self.style);

    let mention = Mention::new(mention.name, start);
    tracing::debug!(
      name = %mention.name,
      offset = mention.offset,
      replaced = removed,
      "inserted mention"
    );
    self.reconciler.register(mention.clone())?;
    Ok(mention)
  }
}
