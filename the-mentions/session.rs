//! One mention session bound to one text widget.
//!
//! [`Mentions`] owns the host, the scanner and the registry. The host reports
//! user edits through [`Mentions::text_changed`] and caret moves through
//! [`Mentions::caret_moved`]; the session keeps mentions and highlights in
//! step and tells its listeners about new queries and registry changes.
//!
//! ```
//! use the_mentions::{
//!   Edit,
//!   Mention,
//!   MentionHost,
//!   Mentions,
//!   MentionsConfig,
//!   RopeHost,
//! };
//!
//! let config = MentionsConfig::new(13, "orange").unwrap();
//! let mut mentions = Mentions::new(RopeHost::new("Hello "), config);
//!
//! mentions.host_mut().replace_range(6, 0, "@Br");
//! mentions.host_mut().set_caret(9);
//! mentions.text_changed(Edit::insert(6, 3));
//! assert_eq!(mentions.current_query().as_str(), "Br");
//!
//! mentions.insert_mention(Mention::new("Brent", 0)).unwrap();
//! assert_eq!(mentions.host().text(), "Hello Brent ");
//! assert_eq!(mentions.mentions(), &[Mention::new("Brent", 6)]);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use the_core::text::{
  char_len,
  slice_matches,
};

use crate::{
  Tendril,
  config::MentionsConfig,
  host::MentionHost,
  inserter::MentionInserter,
  mention::{
    Mention,
    MentionError,
    Result,
  },
  reconciler::{
    Edit,
    MentionReconciler,
  },
  scanner::{
    self,
    QueryScanner,
  },
};

/// Receives the query under the caret after every scan. An empty query means
/// there is nothing to suggest.
pub type QueryListener = Box<dyn FnMut(&str) + Send>;

/// Receives the live mentions after the registry changed.
pub type MentionsListener = Box<dyn FnMut(&[Mention]) + Send>;

/// A session reachable from more than one caller.
pub type SharedMentions<H> = Arc<Mutex<Mentions<H>>>;

pub struct Mentions<H: MentionHost> {
  host:            H,
  scanner:         QueryScanner,
  reconciler:      MentionReconciler,
  highlight_style: H::Style,
  on_query:        Option<QueryListener>,
  on_mentions:     Option<MentionsListener>,
}

impl<H: MentionHost> Mentions<H> {
  pub fn new(host: H, config: MentionsConfig<H::Style>) -> Self {
    Self {
      host,
      scanner: QueryScanner::new(config.max_query_length),
      reconciler: MentionReconciler::new(),
      highlight_style: config.highlight_style,
      on_query: None,
      on_mentions: None,
    }
  }

  #[must_use]
  pub fn with_query_listener<F>(mut self, listener: F) -> Self
  where
    F: FnMut(&str) + Send + 'static,
  {
    self.on_query = Some(Box::new(listener));
    self
  }

  #[must_use]
  pub fn with_mentions_listener<F>(mut self, listener: F) -> Self
  where
    F: FnMut(&[Mention]) + Send + 'static,
  {
    self.on_mentions = Some(Box::new(listener));
    self
  }

  pub fn into_shared(self) -> SharedMentions<H> {
    Arc::new(Mutex::new(self))
  }

  pub fn host(&self) -> &H {
    &self.host
  }

  /// Mutable access to the bound widget. Edits made through it must be
  /// reported with [`Mentions::text_changed`].
  pub fn host_mut(&mut self) -> &mut H {
    &mut self.host
  }

  pub fn scanner(&self) -> &QueryScanner {
    &self.scanner
  }

  pub fn mentions(&self) -> &[Mention] {
    self.reconciler.mentions()
  }

  /// Owned copy of the tracked mentions.
  pub fn inserted_mentions(&self) -> Vec<Mention> {
    self.reconciler.mentions().to_vec()
  }

  /// The query under the caret, empty when there is none.
  pub fn current_query(&self) -> Tendril {
    self
      .scanner
      .scan(Some(self.host.text()), self.host.caret())
  }

  /// Track mentions already present in the text, e.g. when a draft is
  /// reopened. The text itself is not touched.
  pub fn add_mentions(&mut self, mentions: Vec<Mention>) -> Result<()> {
    if mentions.is_empty() {
      return Err(MentionError::NoMentions);
    }
    let text = self.host.text();
    for mention in &mentions {
      mention.validate()?;
      if mention.length != char_len(&mention.name)
        || !slice_matches(text, mention.offset, &mention.name)
      {
        return Err(MentionError::NotInText {
          name:   mention.name.clone(),
          offset: mention.offset,
          length: mention.length,
        });
      }
    }

    self.reconciler.register_bulk(mentions)?;
    self.refresh_highlights();
    self.notify_mentions();
    Ok(())
  }

  /// Commit `mention` in place of the active query.
  ///
  /// On success the query listener is told there is no longer a query.
  pub fn insert_mention(&mut self, mention: impl Into<Option<Mention>>) -> Result<Mention> {
    let inserted = MentionInserter::new(
      &mut self.host,
      &mut self.reconciler,
      &self.highlight_style,
    )
    .insert(mention.into())?;

    self.refresh_highlights();
    self.notify_mentions();
    self.notify_query(&Tendril::new());
    Ok(inserted)
  }

  /// Report an edit the host applied to its text.
  ///
  /// Must be called exactly once per atomic change, after the change and
  /// before the next scan or insertion.
  pub fn text_changed(&mut self, edit: Edit) {
    let len = self.host.text().len_chars();
    debug_assert!(
      edit.inserted_end() <= len,
      "edit {edit:?} does not fit a text of {len} chars"
    );

    // Everything was removed and nothing inserted.
    let cleared = len == 0 && edit.start == 0 && edit.inserted == 0 && edit.removed > 0;
    let mut changed = if cleared {
      let had_mentions = !self.reconciler.is_empty();
      self.reconciler.clear();
      had_mentions
    } else {
      self.reconciler.reconcile(edit).changed()
    };

    changed |= !self.refresh_highlights().is_empty();
    if changed {
      self.notify_mentions();
    }

    let query = self.current_query();
    self.notify_query(&query);
  }

  /// Report that the caret moved without the text changing.
  ///
  /// Rescans only when the caret sits in a word that starts with the
  /// trigger.
  pub fn caret_moved(&mut self) {
    if !scanner::caret_word_starts_with_trigger(self.host.text(), self.host.caret()) {
      return;
    }
    let query = self.current_query();
    self.notify_query(&query);
  }

  /// Repaint every mention, dropping the ones whose text no longer spells
  /// their name. Returns the dropped mentions.
  pub fn refresh_highlights(&mut self) -> Vec<Mention> {
    self.host.clear_highlights();

    let text = self.host.text();
    let lost = self.reconciler.retain(|mention| {
      mention.length == char_len(&mention.name)
        && slice_matches(text, mention.offset, &mention.name)
    });
    for mention in &lost {
      tracing::warn!(name = %mention.name, offset = mention.offset, "mention lost");
    }

    for mention in self.reconciler.mentions() {
      self
        .host
        .highlight(mention.offset, mention.length, &self.highlight_style);
    }
    lost
  }

  fn notify_query(&mut self, query: &str) {
    tracing::trace!(query, "query changed");
    if let Some(listener) = self.on_query.as_mut() {
      listener(query);
    }
  }

  fn notify_mentions(&mut self) {
    if let Some(listener) = self.on_mentions.as_mut() {
      listener(self.reconciler.mentions());
    }
  }
}

impl<H> std::fmt::Debug for Mentions<H>
where
  H: MentionHost + std::fmt::Debug,
  H::Style: std::fmt::Debug,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Mentions")
      .field("host", &self.host)
      .field("scanner", &self.scanner)
      .field("reconciler", &self.reconciler)
      .field("highlight_style", &self.highlight_style)
      .finish_non_exhaustive()
  }
}
