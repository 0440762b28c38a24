//! Integration tests for `SqliteStore` against an in-memory database.

use catalog_core::{
  account::{NewAccount, Role},
  course::{CourseFields, DEFAULT_LEVEL},
  store::CatalogStore,
};
use chrono::NaiveDate;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Accounts ────────────────────────────────────────────────────────────────

fn new_account(identity: &str) -> NewAccount {
  NewAccount {
    name:          "Ana Torres".into(),
    identity:      identity.into(),
    phone:         None,
    password_hash: "$argon2id$placeholder".into(),
    role:          Role::User,
  }
}

#[tokio::test]
async fn insert_and_find_account() {
  let s = store().await;

  let mut input = new_account("ana@example.com");
  input.phone = Some("+57 300 000 0000".into());
  let account = s.insert_account(input).await.unwrap();
  assert_eq!(account.role, Role::User);

  let fetched = s
    .find_account_by_identity("ana@example.com")
    .await
    .unwrap()
    .expect("account should exist");
  assert_eq!(fetched.id, account.id);
  assert_eq!(fetched.phone.as_deref(), Some("+57 300 000 0000"));
  assert_eq!(fetched.password_hash, "$argon2id$placeholder");
}

#[tokio::test]
async fn find_missing_account_returns_none() {
  let s = store().await;
  assert!(s.find_account_by_identity("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn identity_lookup_is_case_preserving() {
  let s = store().await;
  s.insert_account(new_account("Ana@Example.com")).await.unwrap();

  let fetched = s.find_account_by_identity("Ana@Example.com").await.unwrap().unwrap();
  assert_eq!(fetched.identity, "Ana@Example.com");
}

#[tokio::test]
async fn identity_lookup_ignores_case() {
  let s = store().await;
  let account = s.insert_account(new_account("Ana@Example.com")).await.unwrap();

  let fetched = s.find_account_by_identity("ana@EXAMPLE.COM").await.unwrap().unwrap();
  assert_eq!(fetched.id, account.id);
  assert_eq!(fetched.identity, "Ana@Example.com", "stored spelling is kept");
}

#[tokio::test]
async fn identity_uniqueness_ignores_case() {
  let s = store().await;
  s.insert_account(new_account("ana@example.com")).await.unwrap();

  let err = s.insert_account(new_account("ANA@Example.COM")).await.unwrap_err();
  assert!(
    matches!(err, Error::Core(catalog_core::Error::IdentityTaken(_))),
    "got {err:?}"
  );
}

#[tokio::test]
async fn duplicate_identity_is_rejected_by_constraint() {
  let s = store().await;
  s.insert_account(new_account("ana@example.com")).await.unwrap();

  let err = s.insert_account(new_account("ana@example.com")).await.unwrap_err();
  assert!(
    matches!(err, Error::Core(catalog_core::Error::IdentityTaken(ref id)) if id == "ana@example.com"),
    "got {err:?}"
  );
}

#[tokio::test]
async fn admin_role_roundtrips() {
  let s = store().await;
  let mut input = new_account("root@example.com");
  input.role = Role::Admin;
  s.insert_account(input).await.unwrap();

  let fetched = s.find_account_by_identity("root@example.com").await.unwrap().unwrap();
  assert_eq!(fetched.role, Role::Admin);
}

// ─── Courses ─────────────────────────────────────────────────────────────────

fn fields(title: &str, cost: f64) -> CourseFields {
  CourseFields::new(
    title,
    "Grace Hopper",
    24,
    "Intermediate",
    NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
    cost,
  )
  .unwrap()
}

#[tokio::test]
async fn list_empty_store_returns_empty_vec() {
  let s = store().await;
  assert!(s.list_courses().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_is_newest_first() {
  let s = store().await;
  let c1 = s.insert_course(fields("C1", 10.0)).await.unwrap();
  let c2 = s.insert_course(fields("C2", 10.0)).await.unwrap();
  let c3 = s.insert_course(fields("C3", 10.0)).await.unwrap();

  let ids: Vec<i64> = s.list_courses().await.unwrap().iter().map(|c| c.id).collect();
  assert_eq!(ids, vec![c3.id, c2.id, c1.id]);
}

#[tokio::test]
async fn insert_and_get_course() {
  let s = store().await;
  let created = s.insert_course(fields("Compilers", 99.5)).await.unwrap();

  let fetched = s.get_course(created.id).await.unwrap().expect("course");
  assert_eq!(fetched.title, "Compilers");
  assert_eq!(fetched.instructor, "Grace Hopper");
  assert_eq!(fetched.hours, 24);
  assert_eq!(fetched.level, "Intermediate");
  assert_eq!(fetched.start_date, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
  assert_eq!(fetched.cost, 99.5);
}

#[tokio::test]
async fn zero_cost_is_stored_as_zero() {
  let s = store().await;
  let created = s.insert_course(fields("Intro", 0.0)).await.unwrap();

  let fetched = s.get_course(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.cost, 0.0);
  assert!(fetched.is_free());
}

#[tokio::test]
async fn update_replaces_all_fields() {
  let s = store().await;
  let created = s.insert_course(fields("Old", 5.0)).await.unwrap();

  let replacement = CourseFields::new(
    "New",
    "Barbara Liskov",
    8,
    "Advanced",
    NaiveDate::from_ymd_opt(2027, 1, 15).unwrap(),
    12.0,
  )
  .unwrap();
  let updated = s.update_course(created.id, replacement).await.unwrap();

  assert_eq!(updated.id, created.id);
  assert_eq!(updated.created_at, created.created_at);
  assert_eq!(updated.title, "New");
  assert_eq!(updated.instructor, "Barbara Liskov");
  assert_eq!(updated.hours, 8);
  assert_eq!(updated.level, "Advanced");
  assert_eq!(updated.cost, 12.0);

  let fetched = s.get_course(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_missing_course_leaves_store_unchanged() {
  let s = store().await;
  s.insert_course(fields("Keep", 1.0)).await.unwrap();
  let before = s.list_courses().await.unwrap();

  let err = s.update_course(9_999, fields("Ghost", 1.0)).await.unwrap_err();
  assert!(matches!(err, Error::Core(catalog_core::Error::CourseNotFound(9_999))));

  assert_eq!(s.list_courses().await.unwrap(), before);
}

#[tokio::test]
async fn delete_twice_reports_not_found() {
  let s = store().await;
  let created = s.insert_course(fields("Gone", 1.0)).await.unwrap();

  s.delete_course(created.id).await.unwrap();
  let err = s.delete_course(created.id).await.unwrap_err();
  assert!(matches!(err, Error::Core(catalog_core::Error::CourseNotFound(_))));
  assert!(s.get_course(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
  let s = store().await;
  let first = s.insert_course(fields("A", 1.0)).await.unwrap();
  s.delete_course(first.id).await.unwrap();
  let second = s.insert_course(fields("B", 1.0)).await.unwrap();
  assert!(second.id > first.id);
}

#[tokio::test]
async fn missing_level_reads_back_as_default() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO courses (title, instructor, hours, level, start_date, cost, created_at)
         VALUES ('Legacy', 'Unknown', 3, NULL, '2025-05-01', 0, '2025-04-01T00:00:00.000000Z')",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let courses = s.list_courses().await.unwrap();
  assert_eq!(courses.len(), 1);
  assert_eq!(courses[0].level, DEFAULT_LEVEL);
}

#[tokio::test]
async fn core_error_conversion_keeps_domain_meaning() {
  let s = store().await;
  let err: catalog_core::Error = s.delete_course(42).await.unwrap_err().into();
  assert!(matches!(err, catalog_core::Error::CourseNotFound(42)));
}
