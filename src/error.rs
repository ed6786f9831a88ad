//! Error types for scheduling, storage and configuration.

use thiserror::Error;

use crate::domain::WordRef;

/// Failures raised by the scheduling core
#[derive(Debug, Error, PartialEq)]
pub enum SrsError {
  /// Not enough distinct candidates to build a multiple-choice item
  #[error("need {needed} distractors but the pool only has {available}")]
  InsufficientPool { needed: usize, available: usize },

  /// Weighted sampling asked for more words than carry positive weight
  #[error("cannot sample {requested} words, only {available} have positive weight")]
  InsufficientSample { requested: usize, available: usize },

  /// An update names a word the store does not hold
  #[error("unknown word {0}")]
  UnknownWordReference(WordRef),

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

/// Failures of the word store
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("SQLite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  /// A thread panicked while holding the connection
  #[error("database unavailable")]
  Lock,
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("could not read {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("TOML error: {0}")]
  Toml(#[from] toml::de::Error),

  #[error(transparent)]
  Invalid(#[from] SrsError),
}

/// Anything a review operation can fail with
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Srs(#[from] SrsError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
