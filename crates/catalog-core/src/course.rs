//! Course records and the validated field set used to write them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Level shown when a stored course has none. Substituted on read only.
pub const DEFAULT_LEVEL: &str = "Basic";

// ─── Course ──────────────────────────────────────────────────────────────────

/// A persisted course. Courses have no owner; any admin may change any course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
  pub id:         i64,
  pub title:      String,
  pub instructor: String,
  pub hours:      u32,
  /// Free-form; not a closed set.
  pub level:      String,
  pub start_date: NaiveDate,
  /// Zero means the course is free.
  pub cost:       f64,
  /// Server-assigned; the list ordering key.
  pub created_at: DateTime<Utc>,
}

impl Course {
  pub fn is_free(&self) -> bool { self.cost == 0.0 }
}

// ─── CourseFields ────────────────────────────────────────────────────────────

/// Every mutable course field, already validated.
///
/// Used for both inserts and full-replace updates. The only way to build one
/// is [`CourseFields::new`], so a store never sees an invalid course.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseFields {
  title:      String,
  instructor: String,
  hours:      u32,
  level:      String,
  start_date: NaiveDate,
  cost:       f64,
}

impl CourseFields {
  pub fn new(
    title: impl Into<String>,
    instructor: impl Into<String>,
    hours: i64,
    level: impl Into<String>,
    start_date: NaiveDate,
    cost: f64,
  ) -> Result<Self> {
    let title = required("title", title.into())?;
    let instructor = required("instructor", instructor.into())?;
    let level = required("level", level.into())?;

    let hours = u32::try_from(hours)
      .ok()
      .filter(|h| *h > 0)
      .ok_or_else(|| Error::Invalid("Hours must be a positive whole number.".into()))?;

    if !cost.is_finite() || cost < 0.0 {
      return Err(Error::Invalid("Cost must be a non-negative number.".into()));
    }

    Ok(Self { title, instructor, hours, level, start_date, cost })
  }

  pub fn title(&self) -> &str { &self.title }

  pub fn instructor(&self) -> &str { &self.instructor }

  pub fn hours(&self) -> u32 { self.hours }

  pub fn level(&self) -> &str { &self.level }

  pub fn start_date(&self) -> NaiveDate { self.start_date }

  pub fn cost(&self) -> f64 { self.cost }

  /// Combine with store-assigned metadata into a full [`Course`].
  pub fn into_course(self, id: i64, created_at: DateTime<Utc>) -> Course {
    Course {
      id,
      title: self.title,
      instructor: self.instructor,
      hours: self.hours,
      level: self.level,
      start_date: self.start_date,
      cost: self.cost,
      created_at,
    }
  }
}

fn required(field: &str, value: String) -> Result<String> {
  if value.trim().is_empty() {
    return Err(Error::Invalid(format!("The {field} field is required.")));
  }
  Ok(value)
}
