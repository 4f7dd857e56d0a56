//! The confirmed mention value and the errors raised when one is rejected.

use serde::{
  Deserialize,
  Serialize,
};
use the_core::text::{
  char_len,
  is_blank,
};
use thiserror::Error;

use crate::Tendril;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MentionError {
  #[error("cannot insert a missing mention")]
  MissingMention,
  #[error("mention name must be set and not blank")]
  BlankName,
  #[error("mention `{name}` must span at least one character")]
  EmptySpan { name: Tendril },
  #[error("pre-populated mentions must not be empty")]
  NoMentions,
  #[error("mention `{name}` is not present at {offset}..{end} of the text", end = .offset + .length)]
  NotInText {
    name:   Tendril,
    offset: usize,
    length: usize,
  },
}

impl MentionError {
  /// Whether the error rejects the mention value itself rather than its
  /// relation to the buffer.
  pub fn is_invalid_mention(&self) -> bool {
    matches!(
      self,
      Self::MissingMention | Self::BlankName | Self::EmptySpan { .. }
    )
  }
}

pub type Result<T> = std::result::Result<T, MentionError>;

/// A named reference anchored to the half-open span
/// `offset..offset + length` of the buffer, in chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mention {
  pub name:   Tendril,
  pub offset: usize,
  pub length: usize,
}

impl Mention {
  /// A mention whose span covers exactly its name.
  pub fn new(name: impl Into<Tendril>, offset: usize) -> Self {
    let name = name.into();
    let length = char_len(&name);
    Self {
      name,
      offset,
      length,
    }
  }

  pub fn with_length(name: impl Into<Tendril>, offset: usize, length: usize) -> Self {
    Self {
      name: name.into(),
      offset,
      length,
    }
  }

  /// End of the span (exclusive).
  #[inline]
  #[must_use]
  pub fn end(&self) -> usize {
    self.offset + self.length
  }

  #[inline]
  pub fn range(&self) -> std::ops::Range<usize> {
    self.offset..self.end()
  }

  /// Check the shape of the mention before it enters a registry.
  pub fn validate(&self) -> Result<()> {
    if is_blank(&self.name) {
      return Err(MentionError::BlankName);
    }
    if self.length == 0 {
      return Err(MentionError::EmptySpan {
        name: self.name.clone(),
      });
    }
    Ok(())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn length_follows_name() {
    let mention = Mention::new("Brent Watson", 6);
    assert_eq!(mention.length, 12);
    assert_eq!(mention.end(), 18);
    assert_eq!(mention.range(), 6..18);

    let wide = Mention::new("诶世", 0);
    assert_eq!(wide.length, 2);
  }

  #[test]
  fn validation() {
    assert_eq!(Mention::new("Brent", 0).validate(), Ok(()));
    assert_eq!(
      Mention::new("", 0).validate(),
      Err(MentionError::BlankName)
    );
    assert_eq!(
      Mention::new("   ", 0).validate(),
      Err(MentionError::BlankName)
    );
    assert_eq!(
      Mention::with_length("Brent", 0, 0).validate(),
      Err(MentionError::EmptySpan {
        name: "Brent".into(),
      })
    );
  }

  #[test]
  fn invalid_mention_kinds() {
    assert!(MentionError::MissingMention.is_invalid_mention());
    assert!(MentionError::BlankName.is_invalid_mention());
    assert!(!MentionError::NoMentions.is_invalid_mention());
    assert!(
      !MentionError::NotInText {
        name:   "x".into(),
        offset: 0,
        length: 1,
      }
      .is_invalid_mention()
    );
  }

  #[test]
  fn error_messages() {
    let err = MentionError::NotInText {
      name:   "Brent".into(),
      offset: 3,
      length: 5,
    };
    assert_eq!(
      err.to_string(),
      "mention `Brent` is not present at 3..8 of the text"
    );
  }

  #[test]
  fn serde_shape() {
    let mention = Mention::new("Brent", 6);
    let json = serde_json::to_value(&mention).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "name": "Brent", "offset": 6, "length": 5 })
    );
    let back: Mention = serde_json::from_value(json).unwrap();
    assert_eq!(back, mention);
  }
}
