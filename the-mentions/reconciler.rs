//! The registry of confirmed mentions and its upkeep under text edits.
//!
//! Every atomic buffer mutation is described by an [`Edit`]: the half-open
//! range `start..start + removed` was replaced by `inserted` new chars. Each
//! tracked mention `offset..offset + length` is then classified, in this
//! order:
//!
//! - **After**: `start >= offset + length`. The edit begins at or past the
//!   mention's end and the mention is left alone.
//! - **Before**: `start + removed <= offset`. The edit ends at or before the
//!   mention's start, so the mention shifts by `inserted - removed`. A pure
//!   insertion exactly at `offset` lands here.
//! - **Overlap**: anything else. The mention is dropped, whatever was
//!   inserted. Mentions are never resized or merged.

use crate::{
  Tendril,
  mention::{
    Mention,
    Result,
  },
};

/// `(from, to, replacement)` change as produced by the editing layer.
pub type Change = (usize, usize, Option<Tendril>);

/// A single-region replacement of `removed` chars at `start` by `inserted`
/// new chars.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edit {
  pub start:    usize,
  pub removed:  usize,
  pub inserted: usize,
}

impl Edit {
  pub const fn new(start: usize, removed: usize, inserted: usize) -> Self {
    Self {
      start,
      removed,
      inserted,
    }
  }

  pub const fn insert(start: usize, inserted: usize) -> Self {
    Self::new(start, 0, inserted)
  }

  pub const fn delete(start: usize, removed: usize) -> Self {
    Self::new(start, removed, 0)
  }

  pub const fn replace(start: usize, removed: usize, inserted: usize) -> Self {
    Self::new(start, removed, inserted)
  }

  /// Describe a `(from, to, replacement)` change. A reversed range is read
  /// as starting at its smaller end.
  pub fn from_change(change: &Change) -> Self {
    let (from, to, text) = change;
    let start = (*from).min(*to);
    let removed = from.abs_diff(*to);
    let inserted = text.as_ref().map_or(0, |text| text.chars().count());
    Self::new(start, removed, inserted)
  }

  /// End of the removed range (exclusive).
  #[inline]
  pub fn removed_end(&self) -> usize {
    self.start + self.removed
  }

  /// End of the inserted text (exclusive), in post-edit positions.
  #[inline]
  pub fn inserted_end(&self) -> usize {
    self.start + self.inserted
  }

  #[inline]
  pub fn is_noop(&self) -> bool {
    self.removed == 0 && self.inserted == 0
  }

  /// Classify what this edit does to `mention`.
  pub fn effect_on(&self, mention: &Mention) -> EditEffect {
    if self.start >= mention.end() {
      EditEffect::After
    } else if self.removed_end() <= mention.offset {
      EditEffect::Before
    } else {
      EditEffect::Overlap
    }
  }
}

impl From<&Change> for Edit {
  fn from(change: &Change) -> Self {
    Self::from_change(change)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEffect {
  /// The edit lies at or past the end of the mention.
  After,
  /// The edit ends at or before the start of the mention.
  Before,
  /// The edit touches the inside of the mention.
  Overlap,
}

/// What a single [`MentionReconciler::reconcile`] call changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reconciled {
  pub shifted: usize,
  pub removed: Vec<Mention>,
}

impl Reconciled {
  /// Whether any offset moved or any mention was dropped.
  pub fn changed(&self) -> bool {
    self.shifted > 0 || !self.removed.is_empty()
  }
}

/// Ordered registry of the mentions in one buffer.
///
/// Insertion order is kept. Overlapping registrations are not rejected, the
/// caller is trusted not to insert the same span twice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MentionReconciler {
  mentions: Vec<Mention>,
}

impl MentionReconciler {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn mentions(&self) -> &[Mention] {
    &self.mentions
  }

  pub fn len(&self) -> usize {
    self.mentions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.mentions.is_empty()
  }

  /// Append `mention` to the registry.
  pub fn register(&mut self, mention: Mention) -> Result<()> {
    mention.validate()?;
    tracing::debug!(
      name = %mention.name,
      offset = mention.offset,
      length = mention.length,
      "registered mention"
    );
    self.mentions.push(mention);
    Ok(())
  }

  /// Append every mention of `mentions`.
  ///
  /// All entries are validated first: when one is rejected nothing is
  /// registered.
  pub fn register_bulk<I>(&mut self, mentions: I) -> Result<()>
  where
    I: IntoIterator<Item = Mention>,
  {
    let mentions: Vec<Mention> = mentions.into_iter().collect();
    for mention in &mentions {
      mention.validate()?;
    }
    tracing::debug!(count = mentions.len(), "registered mentions");
    self.mentions.extend(mentions);
    Ok(())
  }

  /// Update the registry for one atomic buffer mutation.
  pub fn reconcile(&mut self, edit: Edit) -> Reconciled {
    let mut result = Reconciled::default();
    if edit.is_noop() || self.mentions.is_empty() {
      return result;
    }

    self.mentions.retain_mut(|mention| {
      match edit.effect_on(mention) {
        EditEffect::After => true,
        EditEffect::Before => {
          if edit.removed != edit.inserted {
            mention.offset = mention.offset - edit.removed + edit.inserted;
            result.shifted += 1;
          }
          true
        },
        EditEffect::Overlap => {
          tracing::debug!(
            name = %mention.name,
            offset = mention.offset,
            length = mention.length,
            ?edit,
            "edit overlaps mention, removing it"
          );
          result.removed.push(mention.clone());
          false
        },
      }
    });

    tracing::trace!(?edit, shifted = result.shifted, removed = result.removed.len(), "reconciled");
    result
  }

  /// Keep only the mentions for which `keep` returns `true`, returning the
  /// dropped ones in order.
  pub fn retain<F>(&mut self, mut keep: F) -> Vec<Mention>
  where
    F: FnMut(&Mention) -> bool,
  {
    let mut dropped = Vec::new();
    self.mentions.retain(|mention| {
      if keep(mention) {
        true
      } else {
        dropped.push(mention.clone());
        false
      }
    });
    dropped
  }

  /// Forget every mention.
  pub fn clear(&mut self) {
    if !self.mentions.is_empty() {
      tracing::debug!(count = self.mentions.len(), "cleared mentions");
    }
    self.mentions.clear();
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::mention::MentionError;

  /// "Hello Brent Watson" with the mention registered at 6..18.
  fn brent() -> MentionReconciler {
    let mut reconciler = MentionReconciler::new();
    reconciler
      .register(Mention::new("Brent Watson", "Hello ".len()))
      .unwrap();
    reconciler
  }

  #[test]
  fn insertion_at_mention_start_shifts() {
    let mut reconciler = brent();
    let result = reconciler.reconcile(Edit::insert(6, 4));
    assert_eq!(result.shifted, 1);
    assert!(result.removed.is_empty());
    assert_eq!(reconciler.mentions(), &[Mention::with_length(
      "Brent Watson",
      10,
      12
    )]);
  }

  #[test]
  fn insertion_inside_mention_removes() {
    let mut reconciler = brent();
    let result = reconciler.reconcile(Edit::insert(11, 4));
    assert_eq!(result.removed, vec![Mention::new("Brent Watson", 6)]);
    assert!(reconciler.is_empty());
  }

  #[test]
  fn insertion_before_last_char_removes() {
    // "Hello Brent Watson" -> "Hello Brent WatsoTestn"
    let mut reconciler = brent();
    reconciler.reconcile(Edit::insert(17, 4));
    assert!(reconciler.is_empty());
  }

  #[test]
  fn deleting_all_text_removes() {
    let mut reconciler = brent();
    reconciler.reconcile(Edit::delete(0, 18));
    assert!(reconciler.is_empty());
  }

  #[test]
  fn partial_deletion_removes() {
    // "Hello Brent Watson" -> "Hatson"
    let mut reconciler = brent();
    reconciler.reconcile(Edit::delete(1, "ello Brent W".len()));
    assert!(reconciler.is_empty());
  }

  #[test]
  fn partial_replacement_removes() {
    // "Hello Brent Watson" -> "HTestatson"
    let mut reconciler = brent();
    reconciler.reconcile(Edit::replace(1, "ello Brent W".len(), 4));
    assert!(reconciler.is_empty());
  }

  #[test]
  fn same_length_replacement_inside_removes() {
    let mut reconciler = brent();
    let result = reconciler.reconcile(Edit::replace(7, 2, 2));
    assert_eq!(result.removed.len(), 1);
    assert!(reconciler.is_empty());
  }

  #[test]
  fn edit_at_mention_end_is_untouched() {
    let mut reconciler = brent();
    let result = reconciler.reconcile(Edit::insert(18, 1));
    assert!(!result.changed());
    assert_eq!(reconciler.mentions(), &[Mention::new("Brent Watson", 6)]);

    let result = reconciler.reconcile(Edit::replace(20, 3, 0));
    assert!(!result.changed());
    assert_eq!(reconciler.mentions(), &[Mention::new("Brent Watson", 6)]);
  }

  #[test]
  fn deletion_ending_at_mention_start_shifts() {
    // "Hello Brent Watson" -> "HelloBrent Watson"
    let mut reconciler = brent();
    reconciler.reconcile(Edit::delete(5, 1));
    assert_eq!(reconciler.mentions(), &[Mention::new("Brent Watson", 5)]);
  }

  #[test]
  fn deletion_crossing_mention_start_removes() {
    let mut reconciler = brent();
    reconciler.reconcile(Edit::delete(5, 2));
    assert!(reconciler.is_empty());
  }

  #[test]
  fn same_length_replacement_before_does_not_shift() {
    let mut reconciler = brent();
    let result = reconciler.reconcile(Edit::replace(0, 5, 5));
    assert_eq!(result.shifted, 0);
    assert_eq!(reconciler.mentions(), &[Mention::new("Brent Watson", 6)]);
  }

  #[test]
  fn noop_edit_is_ignored() {
    let mut reconciler = brent();
    let result = reconciler.reconcile(Edit::new(10, 0, 0));
    assert!(!result.changed());
    assert_eq!(reconciler.len(), 1);
  }

  #[test]
  fn only_conflicting_mentions_are_removed() {
    // "@a @bb @ccc"
    let mut reconciler = MentionReconciler::new();
    reconciler
      .register_bulk([
        Mention::new("a", 0),
        Mention::new("bb", 2),
        Mention::new("ccc", 5),
      ])
      .unwrap();

    let result = reconciler.reconcile(Edit::replace(3, 1, 3));
    assert_eq!(result.removed, vec![Mention::new("bb", 2)]);
    assert_eq!(result.shifted, 1);
    assert_eq!(reconciler.mentions(), &[
      Mention::new("a", 0),
      Mention::new("ccc", 7)
    ]);
  }

  #[test]
  fn register_rejects_blank_name() {
    let mut reconciler = MentionReconciler::new();
    let err = reconciler.register(Mention::new("", 0)).unwrap_err();
    assert_eq!(err, MentionError::BlankName);
    assert!(err.is_invalid_mention());
    assert!(reconciler.is_empty());
  }

  #[test]
  fn register_rejects_empty_span() {
    let mut reconciler = MentionReconciler::new();
    let err = reconciler
      .register(Mention::with_length("Brent", 0, 0))
      .unwrap_err();
    assert!(matches!(err, MentionError::EmptySpan { .. }));
  }

  #[test]
  fn register_keeps_offset_and_length() {
    let mut reconciler = MentionReconciler::new();
    reconciler
      .register(Mention::with_length("Brent", 3, 7))
      .unwrap();
    assert_eq!(reconciler.mentions(), &[Mention::with_length("Brent", 3, 7)]);
  }

  #[test]
  fn bulk_registration_is_all_or_nothing() {
    let mut reconciler = MentionReconciler::new();
    let err = reconciler
      .register_bulk([Mention::new("a", 0), Mention::new(" ", 4)])
      .unwrap_err();
    assert_eq!(err, MentionError::BlankName);
    assert!(reconciler.is_empty());
  }

  #[test]
  fn edit_after_all_bulk_mentions() {
    let mentions = vec![
      Mention::new("Ann", 0),
      Mention::new("Bob", 4),
      Mention::new("Cy", 8),
    ];
    let mut reconciler = MentionReconciler::new();
    reconciler.register_bulk(mentions.clone()).unwrap();
    reconciler.reconcile(Edit::replace(10, 0, 5));
    reconciler.reconcile(Edit::delete(12, 2));
    assert_eq!(reconciler.mentions(), mentions.as_slice());
  }

  #[test]
  fn edit_from_change() {
    assert_eq!(
      Edit::from_change(&(6, 6, Some("Test".into()))),
      Edit::insert(6, 4)
    );
    assert_eq!(Edit::from_change(&(1, 13, None)), Edit::delete(1, 12));
    let reversed: Change = (5, 2, Some("诶".into()));
    assert_eq!(Edit::from(&reversed), Edit::replace(2, 3, 1));
    assert_eq!(Edit::replace(2, 3, 1).removed_end(), 5);
    assert_eq!(Edit::replace(2, 3, 1).inserted_end(), 3);
  }

  #[test]
  fn retain_and_clear() {
    let mut reconciler = MentionReconciler::new();
    reconciler
      .register_bulk([Mention::new("a", 0), Mention::new("b", 2)])
      .unwrap();
    let dropped = reconciler.retain(|mention| mention.name.as_str() != "a");
    assert_eq!(dropped, vec![Mention::new("a", 0)]);
    assert_eq!(reconciler.len(), 1);
    reconciler.clear();
    assert!(reconciler.is_empty());
  }

  /// Non-overlapping mentions built from gap/length pairs.
  fn layout(spans: &[(u8, u8)]) -> Vec<Mention> {
    let mut offset = 0;
    spans
      .iter()
      .map(|&(gap, len)| {
        let length = len as usize % 8 + 1;
        offset += gap as usize % 8;
        let mention = Mention::with_length("m", offset, length);
        offset += length;
        mention
      })
      .collect()
  }

  quickcheck::quickcheck! {
    fn survivors_never_overlap_the_edit(spans: Vec<(u8, u8)>, start: u8, removed: u8, inserted: u8) -> bool {
      let mentions = layout(&spans);
      let edit = Edit::new(start as usize, removed as usize % 16, inserted as usize % 16);
      let expected = mentions
        .iter()
        .filter(|mention| edit.is_noop() || edit.effect_on(mention) != EditEffect::Overlap)
        .count();

      let mut reconciler = MentionReconciler::new();
      reconciler.register_bulk(mentions).unwrap();
      reconciler.reconcile(edit);

      reconciler.len() == expected
        && reconciler.mentions().iter().all(|mention| {
          edit.is_noop() || mention.end() <= edit.start || mention.offset >= edit.inserted_end()
        })
    }

    fn edits_past_every_mention_change_nothing(spans: Vec<(u8, u8)>, gap: u8, removed: u8, inserted: u8) -> bool {
      let mentions = layout(&spans);
      let end = mentions.iter().map(Mention::end).max().unwrap_or(0);
      let edit = Edit::new(end + gap as usize, removed as usize, inserted as usize);

      let mut reconciler = MentionReconciler::new();
      reconciler.register_bulk(mentions.clone()).unwrap();
      let result = reconciler.reconcile(edit);
      !result.changed() && reconciler.mentions() == mentions.as_slice()
    }
  }
}
