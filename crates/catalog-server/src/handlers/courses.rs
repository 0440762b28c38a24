//! Handlers for `/courses` endpoints.
//!
//! | Method   | Path | Guard | Notes |
//! |----------|------|-------|-------|
//! | `GET`    | `/courses` | none | Newest first |
//! | `GET`    | `/courses/{id}` | none | 404 if not found |
//! | `POST`   | `/courses` | admin | Body: [`CourseBody`]; 201 |
//! | `PUT`    | `/courses/{id}` | admin | Body: [`CourseBody`]; full replace |
//! | `DELETE` | `/courses/{id}` | admin | 404 if not found |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use catalog_core::{
  course::{Course, CourseFields},
  store::CatalogStore,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
  AppState,
  auth::AdminSession,
  error::{self, Error},
  handlers::{Message, present},
};

/// Wire form of a course: the stored fields plus a derived `is_free` flag.
#[derive(Debug, Serialize)]
pub struct CourseView {
  #[serde(flatten)]
  pub course:  Course,
  pub is_free: bool,
}

impl From<Course> for CourseView {
  fn from(course: Course) -> Self {
    let is_free = course.is_free();
    Self { course, is_free }
  }
}

#[derive(Debug, Serialize)]
pub struct CourseSaved {
  pub message: &'static str,
  pub course:  CourseView,
}

// ─── Body ────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /courses` and `PUT /courses/{id}`.
///
/// Every field is required for both; an update replaces the whole record.
#[derive(Debug, Default, Deserialize)]
pub struct CourseBody {
  #[serde(alias = "nombre_curso")]
  pub title:      Option<String>,
  #[serde(alias = "nombre_instructor")]
  pub instructor: Option<String>,
  #[serde(alias = "horas")]
  pub hours:      Option<i64>,
  #[serde(alias = "nivel")]
  pub level:      Option<String>,
  #[serde(alias = "fecha_inicio")]
  pub start_date: Option<NaiveDate>,
  #[serde(alias = "costo")]
  pub cost:       Option<f64>,
}

impl TryFrom<CourseBody> for CourseFields {
  type Error = catalog_core::Error;

  fn try_from(b: CourseBody) -> Result<Self, Self::Error> {
    let missing = || catalog_core::Error::Invalid("All fields are required.".into());
    CourseFields::new(
      present(b.title).ok_or_else(missing)?,
      present(b.instructor).ok_or_else(missing)?,
      b.hours.ok_or_else(missing)?,
      present(b.level).ok_or_else(missing)?,
      b.start_date.ok_or_else(missing)?,
      b.cost.ok_or_else(missing)?,
    )
  }
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /courses`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<CourseView>>, Error>
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  let courses = state.store.list_courses().await.map_err(error::store)?;
  Ok(Json(courses.into_iter().map(CourseView::from).collect()))
}

/// `GET /courses/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CourseView>, Error>
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  let Path(id) = id?;
  let course = state
    .store
    .get_course(id)
    .await
    .map_err(error::store)?
    .ok_or_else(Error::course_not_found)?;
  Ok(Json(course.into()))
}

// ─── Writes (admin only) ─────────────────────────────────────────────────────

/// `POST /courses`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  AdminSession(admin): AdminSession,
  body: Result<Json<CourseBody>, JsonRejection>,
) -> Result<impl IntoResponse, Error>
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  let Json(body) = body?;
  let fields = CourseFields::try_from(body)?;

  let course = state.store.insert_course(fields).await.map_err(error::store)?;
  info!(course_id = course.id, admin_id = admin.id, "course created");

  Ok((
    StatusCode::CREATED,
    Json(CourseSaved { message: "Course created.", course: course.into() }),
  ))
}

/// `PUT /courses/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  AdminSession(admin): AdminSession,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<CourseBody>, JsonRejection>,
) -> Result<Json<CourseSaved>, Error>
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  let Path(id) = id?;
  let Json(body) = body?;
  let fields = CourseFields::try_from(body)?;

  let course = state.store.update_course(id, fields).await.map_err(error::store)?;
  info!(course_id = id, admin_id = admin.id, "course updated");

  Ok(Json(CourseSaved { message: "Course updated.", course: course.into() }))
}

/// `DELETE /courses/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  AdminSession(admin): AdminSession,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Message>, Error>
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  let Path(id) = id?;
  state.store.delete_course(id).await.map_err(error::store)?;
  info!(course_id = id, admin_id = admin.id, "course deleted");

  Ok(Json(Message::new("Course deleted.")))
}
