//! Small helpers for measuring and comparing text in char units.
//!
//! Every position handed between the mention engine and its host is a char
//! index, the unit [`ropey`] indexes by.

use ropey::RopeSlice;

/// Number of chars in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
  s.chars().count()
}

/// Whether `text` holds exactly `expected` at `start`.
///
/// Returns `false` instead of panicking when the span runs past the end of
/// `text`.
pub fn slice_matches(text: RopeSlice, start: usize, expected: &str) -> bool {
  let len = char_len(expected);
  let Some(end) = start.checked_add(len) else {
    return false;
  };
  if end > text.len_chars() {
    return false;
  }
  text.slice(start..end).chars().eq(expected.chars())
}

/// Whether `text` is empty or consists only of whitespace.
#[inline]
pub fn is_blank(text: &str) -> bool {
  text.chars().all(crate::chars::char_is_blank)
}
