//! The `CatalogStore` trait.
//!
//! Implemented by storage backends (e.g. `catalog-store-sqlite`). The server
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  account::{Account, NewAccount},
  course::{Course, CourseFields},
};

/// Durable storage for accounts and courses.
///
/// Backend errors must convert into [`crate::Error`] so callers can tell a
/// duplicate identity or a missing course apart from an I/O failure.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Look up an account by its exact identity string.
  fn find_account_by_identity<'a>(
    &'a self,
    identity: &'a str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;

  /// Persist a new account.
  ///
  /// Fails with [`crate::Error::IdentityTaken`] when the identity exists. The
  /// backend's unique constraint is authoritative, so this holds even when a
  /// caller's earlier existence check raced with another insert.
  fn insert_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  // ── Courses ───────────────────────────────────────────────────────────

  /// All courses, newest first. Empty when there are none.
  fn list_courses(
    &self,
  ) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + '_;

  /// Retrieve one course. Returns `None` if not found.
  fn get_course(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + '_;

  /// Assign an id and creation timestamp and persist.
  fn insert_course(
    &self,
    fields: CourseFields,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  /// Replace every mutable field of course `id` in one statement.
  ///
  /// Fails with [`crate::Error::CourseNotFound`] if there is no such course.
  fn update_course(
    &self,
    id: i64,
    fields: CourseFields,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  /// Remove course `id`.
  ///
  /// Fails with [`crate::Error::CourseNotFound`] if there is no such course.
  fn delete_course(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
