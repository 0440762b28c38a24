pub mod accounts;
pub mod courses;

use serde::Serialize;

/// `{"message": "..."}` confirmation payload.
#[derive(Debug, Serialize)]
pub struct Message {
  pub message: &'static str,
}

impl Message {
  pub(crate) fn new(message: &'static str) -> Self { Self { message } }
}

/// Treat absent and blank strings alike.
pub(crate) fn present(value: Option<String>) -> Option<String> {
  value.filter(|s| !s.trim().is_empty())
}
