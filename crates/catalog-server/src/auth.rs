//! Session-cookie guards.
//!
//! [`CurrentSession`] rejects requests without a live session (401).
//! [`AdminSession`] builds on it and also rejects non-admin sessions (403).
//! Both are extractors, so they run before the handler body and before the
//! request body is parsed.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use catalog_core::{account::AccountSnapshot, store::CatalogStore};
use chrono::TimeDelta;

use crate::{AppState, error::Error, session::SessionManager};

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE: &str = "catalog_session";

/// Any logged-in caller.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub AccountSnapshot);

/// A logged-in caller whose snapshot carries the admin role.
#[derive(Debug, Clone)]
pub struct AdminSession(pub AccountSnapshot);

/// The session token sent by the client, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
  CookieJar::from_headers(headers)
    .get(SESSION_COOKIE)
    .map(|c| c.value().to_owned())
}

/// Resolve the caller's session from request headers.
pub fn require_session(
  headers: &HeaderMap,
  sessions: &SessionManager,
) -> Result<AccountSnapshot, Error> {
  let token = session_token(headers).ok_or_else(Error::no_session)?;
  sessions.resolve(&token).ok_or_else(Error::no_session)
}

/// Admit only admin snapshots. Decides from the snapshot alone, never from a
/// fresh account lookup.
pub fn require_admin(snapshot: AccountSnapshot) -> Result<AccountSnapshot, Error> {
  if snapshot.role.is_admin() {
    Ok(snapshot)
  } else {
    Err(Error::admins_only())
  }
}

/// `HttpOnly` cookie carrying `token`, expiring with the session.
pub fn session_cookie(token: String, ttl: TimeDelta) -> Cookie<'static> {
  Cookie::build((SESSION_COOKIE, token))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .max_age(time::Duration::seconds(ttl.num_seconds()))
    .build()
}

/// Cookie used to clear the session cookie on logout.
pub fn cleared_cookie() -> Cookie<'static> {
  Cookie::build(SESSION_COOKIE).path("/").build()
}

impl<S> FromRequestParts<AppState<S>> for CurrentSession
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    require_session(&parts.headers, &state.sessions).map(CurrentSession)
  }
}

impl<S> FromRequestParts<AppState<S>> for AdminSession
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let CurrentSession(snapshot) = CurrentSession::from_request_parts(parts, state).await?;
    require_admin(snapshot).map(AdminSession)
  }
}
