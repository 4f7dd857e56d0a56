//! Construction-time options of a mention session.
//!
//! ```
//! use the_mentions::MentionsConfig;
//!
//! let config: MentionsConfig<String> = MentionsConfig::from_toml_str(
//!   r##"
//!   max_query_length = 13
//!   highlight_style = "#ff9900"
//!   "##,
//! )
//! .unwrap();
//! assert_eq!(config.max_query_length.get(), 13);
//! ```

use std::num::NonZeroUsize;

use serde::{
  Deserialize,
  Serialize,
  de::DeserializeOwned,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("maximum query length must be greater than 0")]
  ZeroMaxQueryLength,
  #[error("failed to parse mentions config: {0}")]
  Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Both options are required: there is no built-in query length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MentionsConfig<S> {
  /// Longest query, in chars, still reported after a trigger.
  pub max_query_length: NonZeroUsize,
  /// Passed through to [`crate::MentionHost::highlight`].
  pub highlight_style:  S,
}

impl<S> MentionsConfig<S> {
  pub fn new(max_query_length: usize, highlight_style: S) -> Result<Self> {
    let max_query_length =
      NonZeroUsize::new(max_query_length).ok_or(ConfigError::ZeroMaxQueryLength)?;
    Ok(Self {
      max_query_length,
      highlight_style,
    })
  }
}

impl<S: DeserializeOwned> MentionsConfig<S> {
  pub fn from_toml_str(source: &str) -> Result<Self> {
    // Plain integer so that zero maps to `ZeroMaxQueryLength`.
    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Raw<T> {
      max_query_length: usize,
      highlight_style:  T,
    }

    let raw: Raw<S> = toml::from_str(source)?;
    Self::new(raw.max_query_length, raw.highlight_style)
  }
}
