//! Error types for `duet-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("message content is empty")]
  EmptyMessage,

  #[error("profile field {0:?} is required")]
  MissingProfileField(&'static str),

  #[error("matching preference is not set")]
  PreferenceUnset,

  #[error("document {key:?} has unsupported version {version}")]
  UnsupportedDocVersion { key: String, version: u32 },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend failure. The core never retries; the caller decides.
  pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(err))
  }

  /// The operation was refused because of bad input; nothing was written.
  pub fn is_validation(&self) -> bool {
    matches!(self, Self::EmptyMessage | Self::MissingProfileField(_))
  }

  /// The session is not configured far enough for the operation.
  pub fn is_configuration(&self) -> bool { matches!(self, Self::PreferenceUnset) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
