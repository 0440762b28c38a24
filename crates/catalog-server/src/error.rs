//! Error types and axum `IntoResponse` implementation.
//!
//! Every failure becomes `{"error": "<message>"}`. Internal failures are
//! logged here and reach the client only as a generic message.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::password::HashError;

/// Shown for both an unknown identity and a wrong secret.
pub const BAD_CREDENTIALS: &str = "Incorrect email or password.";

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Validation(String),
  #[error("{0}")]
  Unauthorized(&'static str),
  #[error("{0}")]
  Forbidden(&'static str),
  #[error("{0}")]
  Conflict(String),
  #[error("{0}")]
  NotFound(String),
  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn no_session() -> Self { Error::Unauthorized("You must log in.") }

  pub fn bad_credentials() -> Self { Error::Unauthorized(BAD_CREDENTIALS) }

  pub fn admins_only() -> Self {
    Error::Forbidden("Access denied. Administrators only.")
  }

  pub fn course_not_found() -> Self { Error::NotFound("Course not found.".into()) }

  fn status(&self) -> StatusCode {
    match self {
      Error::Validation(_) => StatusCode::BAD_REQUEST,
      Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      Error::Forbidden(_) => StatusCode::FORBIDDEN,
      Error::Conflict(_) => StatusCode::CONFLICT,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

/// Map any store error through the domain taxonomy.
pub fn store<E: Into<catalog_core::Error>>(e: E) -> Error { Error::from(e.into()) }

impl From<catalog_core::Error> for Error {
  fn from(e: catalog_core::Error) -> Self {
    use catalog_core::Error as Core;
    match e {
      Core::Invalid(msg) => Error::Validation(msg),
      Core::IdentityTaken(_) => {
        Error::Conflict("That email is already registered.".into())
      }
      Core::CourseNotFound(_) => Error::course_not_found(),
      other @ (Core::UnknownRole(_) | Core::Backend(_)) => {
        Error::Internal(Box::new(other))
      }
    }
  }
}

impl From<HashError> for Error {
  fn from(e: HashError) -> Self { Error::Internal(Box::new(e)) }
}

impl From<JsonRejection> for Error {
  fn from(r: JsonRejection) -> Self { Error::Validation(r.body_text()) }
}

/// A path id that is not an integer cannot name any course.
impl From<PathRejection> for Error {
  fn from(_: PathRejection) -> Self { Error::course_not_found() }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      Error::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        "Internal server error.".to_owned()
      }
      other => other.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn domain_errors_map_to_statuses() {
    let cases = [
      (catalog_core::Error::Invalid("x".into()), StatusCode::BAD_REQUEST),
      (catalog_core::Error::IdentityTaken("a@x.com".into()), StatusCode::CONFLICT),
      (catalog_core::Error::CourseNotFound(3), StatusCode::NOT_FOUND),
      (catalog_core::Error::UnknownRole("root".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (core, expected) in cases {
      assert_eq!(Error::from(core).status(), expected);
    }
  }

  #[tokio::test]
  async fn internal_errors_hide_their_cause() {
    let err = Error::Internal("disk on fire at /var/lib/catalog.db".into());
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = std::str::from_utf8(&bytes).unwrap();
    assert!(!body.contains("disk on fire"), "{body}");
    assert!(body.contains("Internal server error."));
  }
}
