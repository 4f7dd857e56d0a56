//! The text widget the mention engine is bound to.
//!
//! The engine never owns the buffer. It reads the text and caret through
//! [`MentionHost`], asks the host to splice text and paint highlights, and
//! relies on the host to report every edit it did not make itself.

use ropey::{
  Rope,
  RopeSlice,
};

/// Buffer access, mutation and highlighting offered by a text widget.
///
/// All positions and lengths are char indices.
pub trait MentionHost {
  /// Whatever the widget uses to paint a mention. Never interpreted here.
  type Style;

  fn text(&self) -> RopeSlice<'_>;

  fn caret(&self) -> usize;

  fn set_caret(&mut self, pos: usize);

  /// Replace `length` chars at `start` with `text`.
  fn replace_range(&mut self, start: usize, length: usize, text: &str);

  fn highlight(&mut self, start: usize, length: usize, style: &Self::Style);

  /// Drop every highlight applied through [`MentionHost::highlight`].
  fn clear_highlights(&mut self);
}

/// A painted span recorded by [`RopeHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight<S> {
  pub start:  usize,
  pub length: usize,
  pub style:  S,
}

/// In-memory host backed by a [`Rope`].
///
/// Highlights are only recorded, which makes it the host of choice for
/// headless use and tests.
#[derive(Debug, Clone)]
pub struct RopeHost<S> {
  text:       Rope,
  caret:      usize,
  highlights: Vec<Highlight<S>>,
}

impl<S> Default for RopeHost<S> {
  fn default() -> Self {
    Self {
      text:       Rope::new(),
      caret:      0,
      highlights: Vec::new(),
    }
  }
}

impl<S> RopeHost<S> {
  /// A host holding `text` with the caret at its end.
  pub fn new(text: &str) -> Self {
    let text = Rope::from(text);
    let caret = text.len_chars();
    Self {
      text,
      caret,
      highlights: Vec::new(),
    }
  }

  #[must_use]
  pub fn with_caret(mut self, caret: usize) -> Self {
    self.set_caret_clamped(caret);
    self
  }

  pub fn rope(&self) -> &Rope {
    &self.text
  }

  pub fn highlights(&self) -> &[Highlight<S>] {
    &self.highlights
  }

  fn set_caret_clamped(&mut self, caret: usize) {
    self.caret = caret.min(self.text.len_chars());
  }
}

impl<S: Clone> MentionHost for RopeHost<S> {
  type Style = S;

  fn text(&self) -> RopeSlice<'_> {
    self.text.slice(..)
  }

  fn caret(&self) -> usize {
    self.caret
  }

  fn set_caret(&mut self, pos: usize) {
    self.set_caret_clamped(pos);
  }

  fn replace_range(&mut self, start: usize, length: usize, text: &str) {
    let len = self.text.len_chars();
    let start = start.min(len);
    let end = start.saturating_add(length).min(len);
    self.text.remove(start..end);
    self.text.insert(start, text);
    self.set_caret_clamped(self.caret);
  }

  fn highlight(&mut self, start: usize, length: usize, style: &S) {
    self.highlights.push(Highlight {
      start,
      length,
      style: style.clone(),
    });
  }

  fn clear_highlights(&mut self) {
    self.highlights.clear();
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn caret_defaults_to_end() {
    let host = RopeHost::<()>::new("Hello @Br");
    assert_eq!(host.caret(), 9);
    assert_eq!(host.text(), "Hello @Br");
  }

  #[test]
  fn replace_and_clamp() {
    let mut host = RopeHost::<()>::new("Hello @Br").with_caret(9);
    host.replace_range(6, 3, "Brent ");
    assert_eq!(host.text(), "Hello Brent ");
    host.set_caret(40);
    assert_eq!(host.caret(), 12);

    host.replace_range(0, 100, "");
    assert_eq!(host.text(), "");
    assert_eq!(host.caret(), 0);
  }

  #[test]
  fn records_highlights() {
    let mut host = RopeHost::new("Hello Brent");
    host.highlight(6, 5, &"orange");
    assert_eq!(host.highlights(), &[Highlight {
      start:  6,
      length: 5,
      style:  "orange",
    }]);
    host.clear_highlights();
    assert!(host.highlights().is_empty());
  }
}
