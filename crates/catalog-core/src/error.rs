//! Error types for `catalog-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Caller-supplied input is missing or malformed. The message is safe to
  /// show to the client.
  #[error("{0}")]
  Invalid(String),

  #[error("identity already registered: {0}")]
  IdentityTaken(String),

  #[error("course not found: {0}")]
  CourseNotFound(i64),

  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  /// Any failure inside a storage backend that has no domain meaning.
  #[error("backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
