//! Detection of the mention query under the caret.
//!
//! A query is the text typed after a trigger `@` up to the caret. The scanner
//! walks backward from the caret, stopping at the first blank, and then
//! applies the validity rules:
//!
//! - the `@` must open the text or follow a blank (rejects e-mail addresses
//!   such as `hello@percolate.com`),
//! - the first queried character must be alphanumeric (rejects `@!` and
//!   `@@`),
//! - the query must not exceed the configured maximum length.
//!
//! Anything that fails these rules, including absent or empty text, yields
//! an empty query. The scanner never errors.

use std::num::NonZeroUsize;

use ropey::RopeSlice;
use the_core::chars::{
  CharCategory,
  MENTION_TRIGGER,
  categorize_char,
  char_is_blank,
  char_is_mention_start,
};

use crate::Tendril;

/// Extract the mention query ending at `caret`, or an empty string when the
/// caret is not inside a valid query.
pub fn scan(text: Option<RopeSlice>, caret: usize, max_query_length: usize) -> Tendril {
  let Some(text) = text else {
    return Tendril::new();
  };
  if text.len_chars() == 0 || caret == 0 {
    return Tendril::new();
  }

  let Some(trigger) = trigger_before(text, caret) else {
    return Tendril::new();
  };
  if trigger > 0 && !char_is_blank(text.char(trigger - 1)) {
    tracing::trace!(trigger, "trigger is not at a word start");
    return Tendril::new();
  }

  let candidate = text.slice(trigger + 1..caret);
  match candidate.chars().next() {
    Some(first) if char_is_mention_start(first) => {},
    _ => return Tendril::new(),
  }
  if candidate.len_chars() > max_query_length {
    tracing::trace!(
      len = candidate.len_chars(),
      max_query_length,
      "query exceeds maximum length"
    );
    return Tendril::new();
  }

  candidate.chars().collect()
}

/// Position of the trigger that opens the word ending at `caret`.
///
/// Walks backward from `caret - 1` and stops at the first trigger, or gives
/// up at the first blank or the start of the text. No validity rules are
/// applied to what follows the trigger.
pub fn trigger_before(text: RopeSlice, caret: usize) -> Option<usize> {
  if caret == 0 || caret > text.len_chars() {
    return None;
  }

  let mut pos = caret;
  let mut chars = text.chars_at(caret);
  while let Some(ch) = chars.prev() {
    pos -= 1;
    match categorize_char(ch) {
      CharCategory::Trigger => return Some(pos),
      CharCategory::Whitespace | CharCategory::Eol => return None,
      _ => {},
    }
  }
  None
}

/// Whether the blank-delimited word ending at `caret` starts with a trigger.
///
/// Used when the caret moves without typing, to decide whether a rescan is
/// worth it.
pub fn caret_word_starts_with_trigger(text: RopeSlice, caret: usize) -> bool {
  if caret == 0 || caret > text.len_chars() {
    return false;
  }

  let mut start = caret;
  let mut chars = text.chars_at(caret);
  while let Some(ch) = chars.prev() {
    if char_is_blank(ch) {
      break;
    }
    start -= 1;
  }
  start < caret && text.char(start) == MENTION_TRIGGER
}

/// [`scan`] bound to a maximum query length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryScanner {
  max_query_length: NonZeroUsize,
}

impl QueryScanner {
  pub const fn new(max_query_length: NonZeroUsize) -> Self {
    Self { max_query_length }
  }

  pub fn max_query_length(&self) -> usize {
    self.max_query_length.get()
  }

  pub fn set_max_query_length(&mut self, max_query_length: NonZeroUsize) {
    self.max_query_length = max_query_length;
  }

  pub fn scan(&self, text: Option<RopeSlice>, caret: usize) -> Tendril {
    scan(text, caret, self.max_query_length.get())
  }
}
