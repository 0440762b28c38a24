//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that lexical order equals chronological order. Dates are
//! `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound as _, Utc};
use catalog_core::{
  account::{Account, Role},
  course::{Course, DEFAULT_LEVEL},
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current instant at the precision the store keeps, so a value returned
/// from an insert compares equal to the same row read back later.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Admin => "admin",
    Role::User => "usuario",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "admin" => Ok(Role::Admin),
    "usuario" => Ok(Role::User),
    other => Err(catalog_core::Error::UnknownRole(other.to_owned()).into()),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const ACCOUNT_COLUMNS: &str =
  "account_id, name, identity, phone, password_hash, role, created_at";

pub const COURSE_COLUMNS: &str =
  "course_id, title, instructor, hours, level, start_date, cost, created_at";

/// Raw values read directly from an `accounts` row.
pub struct RawAccount {
  pub account_id:    i64,
  pub name:          String,
  pub identity:      String,
  pub phone:         Option<String>,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
}

impl RawAccount {
  /// Column order must match [`ACCOUNT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      account_id:    row.get(0)?,
      name:          row.get(1)?,
      identity:      row.get(2)?,
      phone:         row.get(3)?,
      password_hash: row.get(4)?,
      role:          row.get(5)?,
      created_at:    row.get(6)?,
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      id:            self.account_id,
      name:          self.name,
      identity:      self.identity,
      phone:         self.phone,
      password_hash: self.password_hash,
      role:          decode_role(&self.role)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `courses` row.
pub struct RawCourse {
  pub course_id:  i64,
  pub title:      String,
  pub instructor: String,
  pub hours:      i64,
  pub level:      Option<String>,
  pub start_date: String,
  pub cost:       f64,
  pub created_at: String,
}

impl RawCourse {
  /// Column order must match [`COURSE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      course_id:  row.get(0)?,
      title:      row.get(1)?,
      instructor: row.get(2)?,
      hours:      row.get(3)?,
      level:      row.get(4)?,
      start_date: row.get(5)?,
      cost:       row.get(6)?,
      created_at: row.get(7)?,
    })
  }

  pub fn into_course(self) -> Result<Course> {
    let hours = u32::try_from(self.hours)
      .map_err(|_| Error::Decode(format!("hours out of range: {}", self.hours)))?;

    let level = self
      .level
      .filter(|l| !l.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_LEVEL.to_owned());

    Ok(Course {
      id: self.course_id,
      title: self.title,
      instructor: self.instructor,
      hours,
      level,
      start_date: decode_date(&self.start_date)?,
      cost: self.cost,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let early = DateTime::parse_from_rfc3339("2026-01-01T00:00:05Z").unwrap().with_timezone(&Utc);
    let late = DateTime::parse_from_rfc3339("2026-01-01T00:00:05.000450Z").unwrap().with_timezone(&Utc);
    assert!(encode_dt(early) < encode_dt(late));
    assert_eq!(decode_dt(&encode_dt(late)).unwrap(), late);
  }

  #[test]
  fn unknown_role_is_rejected() {
    assert!(matches!(
      decode_role("superuser"),
      Err(Error::Core(catalog_core::Error::UnknownRole(_)))
    ));
  }
}
