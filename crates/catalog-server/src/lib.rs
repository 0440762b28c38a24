//! HTTP layer for the course catalog.
//!
//! Exposes an axum [`Router`] with the account and course endpoints, backed by
//! any [`CatalogStore`]. Sessions live in memory in a [`SessionManager`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod password;
pub mod session;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use catalog_core::store::CatalogStore;
use chrono::{TimeDelta, Utc};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{accounts, courses};
use session::{DEFAULT_TTL_SECS, SessionManager};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CATALOG_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  /// Absolute session lifetime.
  pub session_ttl_secs:   i64,
  /// How often expired sessions are swept from memory.
  pub session_sweep_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               "127.0.0.1".to_string(),
      port:               3000,
      store_path:         PathBuf::from("catalog.db"),
      session_ttl_secs:   DEFAULT_TTL_SECS,
      session_sweep_secs: 600,
    }
  }
}

impl ServerConfig {
  /// Session lifetime as a [`TimeDelta`]. Must be positive, and a session
  /// created now must be able to expire without overflowing the clock.
  pub fn session_ttl(&self) -> anyhow::Result<TimeDelta> {
    let secs = self.session_ttl_secs;
    let ttl = TimeDelta::try_seconds(secs)
      .filter(|ttl| *ttl > TimeDelta::zero())
      .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
      .ok_or_else(|| {
        anyhow::anyhow!("session_ttl_secs must be a positive number of seconds, got {secs}")
      })?;
    Ok(ttl)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: CatalogStore> {
  pub store:    Arc<S>,
  pub sessions: Arc<SessionManager>,
  pub config:   Arc<ServerConfig>,
}

impl<S: CatalogStore> AppState<S> {
  /// Fails if the configured session lifetime is unusable.
  pub fn new(store: S, config: ServerConfig) -> anyhow::Result<Self> {
    let ttl = config.session_ttl()?;
    Ok(Self {
      store:    Arc::new(store),
      sessions: Arc::new(SessionManager::new(ttl)),
      config:   Arc::new(config),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router. All endpoints are nested under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  let api = Router::new()
    // Accounts
    .route("/accounts/register", post(accounts::register::<S>))
    .route("/accounts/login",    post(accounts::login::<S>))
    .route("/accounts/logout",   post(accounts::logout::<S>))
    .route("/accounts/session",  get(accounts::current))
    // Courses
    .route("/courses", get(courses::list::<S>).post(courses::create::<S>))
    .route(
      "/courses/{id}",
      get(courses::get_one::<S>)
        .put(courses::update::<S>)
        .delete(courses::delete_one::<S>),
    );

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
