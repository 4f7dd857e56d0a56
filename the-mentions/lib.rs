//! Tracking of `@mention` annotations inside an editable text buffer.
//!
//! The crate is split along the two problems it solves:
//!
//! - [`scanner`] decides whether the caret sits inside a mention query and
//!   extracts it.
//! - [`reconciler`] keeps the registry of confirmed mentions consistent while
//!   the text around them is edited.
//!
//! [`inserter`] turns a chosen suggestion into a committed mention, and
//! [`session`] wires everything to a [`host::MentionHost`].

use smartstring::{LazyCompact, SmartString};

pub mod config;
pub mod host;
pub mod inserter;
pub mod mention;
pub mod reconciler;
pub mod scanner;
pub mod session;

pub type Tendril = SmartString<LazyCompact>;

pub use config::MentionsConfig;
pub use host::{
  MentionHost,
  RopeHost,
};
pub use mention::{
  Mention,
  MentionError,
};
pub use reconciler::{
  Edit,
  MentionReconciler,
};
pub use scanner::QueryScanner;
pub use session::Mentions;
