//! [`SqliteStore`], the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use rusqlite::{ErrorCode, OptionalExtension as _};

use catalog_core::{
  account::{Account, NewAccount},
  course::{Course, CourseFields},
  store::CatalogStore,
};

use crate::{
  encode::{
    encode_date, encode_dt, encode_role, now, RawAccount, RawCourse, ACCOUNT_COLUMNS,
    COURSE_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A catalog store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::ConstraintViolation
  )
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn find_account_by_identity(&self, identity: &str) -> Result<Option<Account>> {
    let identity = identity.to_owned();

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE identity = ?1"),
            rusqlite::params![identity],
            RawAccount::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn insert_account(&self, input: NewAccount) -> Result<Account> {
    let created_at = now();

    let name     = input.name.clone();
    let identity = input.identity.clone();
    let phone    = input.phone.clone();
    let hash     = input.password_hash.clone();
    let role_str = encode_role(input.role).to_owned();
    let at_str   = encode_dt(created_at);

    // `None` means the UNIQUE constraint on identity rejected the row.
    let inserted: Option<i64> = self
      .conn
      .call(move |conn| {
        let outcome = conn.execute(
          "INSERT INTO accounts (name, identity, phone, password_hash, role, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![name, identity, phone, hash, role_str, at_str],
        );
        match outcome {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_constraint_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    let id = inserted
      .ok_or_else(|| catalog_core::Error::IdentityTaken(input.identity.clone()))?;

    Ok(Account {
      id,
      name: input.name,
      identity: input.identity,
      phone: input.phone,
      password_hash: input.password_hash,
      role: input.role,
      created_at,
    })
  }

  // ── Courses ───────────────────────────────────────────────────────────────

  async fn list_courses(&self) -> Result<Vec<Course>> {
    let raws: Vec<RawCourse> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COURSE_COLUMNS} FROM courses
           ORDER BY created_at DESC, course_id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawCourse::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCourse::into_course).collect()
  }

  async fn get_course(&self, id: i64) -> Result<Option<Course>> {
    let raw: Option<RawCourse> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COURSE_COLUMNS} FROM courses WHERE course_id = ?1"),
            rusqlite::params![id],
            RawCourse::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCourse::into_course).transpose()
  }

  async fn insert_course(&self, fields: CourseFields) -> Result<Course> {
    let created_at = now();

    let title      = fields.title().to_owned();
    let instructor = fields.instructor().to_owned();
    let hours      = i64::from(fields.hours());
    let level      = fields.level().to_owned();
    let start_date = encode_date(fields.start_date());
    let cost       = fields.cost();
    let at_str     = encode_dt(created_at);

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO courses (title, instructor, hours, level, start_date, cost, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![title, instructor, hours, level, start_date, cost, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(fields.into_course(id, created_at))
  }

  async fn update_course(&self, id: i64, fields: CourseFields) -> Result<Course> {
    let title      = fields.title().to_owned();
    let instructor = fields.instructor().to_owned();
    let hours      = i64::from(fields.hours());
    let level      = fields.level().to_owned();
    let start_date = encode_date(fields.start_date());
    let cost       = fields.cost();

    let raw: Option<RawCourse> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE courses SET
                 title = ?1, instructor = ?2, hours = ?3,
                 level = ?4, start_date = ?5, cost = ?6
               WHERE course_id = ?7
               RETURNING {COURSE_COLUMNS}"
            ),
            rusqlite::params![title, instructor, hours, level, start_date, cost, id],
            RawCourse::from_row,
          )
          .optional()?)
      })
      .await?;

    match raw {
      Some(raw) => raw.into_course(),
      None => Err(catalog_core::Error::CourseNotFound(id).into()),
    }
  }

  async fn delete_course(&self, id: i64) -> Result<()> {
    let affected: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM courses WHERE course_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(catalog_core::Error::CourseNotFound(id).into());
    }
    Ok(())
  }
}
