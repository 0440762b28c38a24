//! Handlers for `/accounts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/accounts/register` | Body: [`RegisterBody`]; 201, no auto-login |
//! | `POST` | `/accounts/login` | Body: [`LoginBody`]; sets the session cookie |
//! | `POST` | `/accounts/logout` | Always 200; clears the cookie |
//! | `GET`  | `/accounts/session` | Snapshot of the current session or 401 |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use catalog_core::{
  account::{AccountSnapshot, MIN_SECRET_LEN, NewAccount, Role},
  store::CatalogStore,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
  AppState,
  auth::{self, CurrentSession},
  error::{self, Error},
  handlers::{Message, present},
  password,
};

#[derive(Debug, Serialize)]
pub struct SessionBody {
  pub account: AccountSnapshot,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub message: &'static str,
  pub account: AccountSnapshot,
}

// ─── Register ────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /accounts/register`.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterBody {
  #[serde(alias = "nombre")]
  pub name:     Option<String>,
  #[serde(alias = "correo")]
  pub identity: Option<String>,
  #[serde(alias = "celular")]
  pub phone:    Option<String>,
  #[serde(alias = "contrasena")]
  pub secret:   Option<String>,
}

/// A registration request whose fields passed validation.
#[derive(Debug)]
pub struct Registration {
  pub name:     String,
  pub identity: String,
  pub phone:    Option<String>,
  pub secret:   String,
}

impl RegisterBody {
  pub fn validate(self) -> Result<Registration, Error> {
    let (Some(name), Some(identity), Some(secret)) =
      (present(self.name), present(self.identity), present(self.secret))
    else {
      return Err(Error::Validation("All fields are required.".into()));
    };

    if secret.chars().count() < MIN_SECRET_LEN {
      return Err(Error::Validation(format!(
        "The password must be at least {MIN_SECRET_LEN} characters long."
      )));
    }

    Ok(Registration { name, identity, phone: present(self.phone), secret })
  }
}

/// `POST /accounts/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<RegisterBody>, JsonRejection>,
) -> Result<impl IntoResponse, Error>
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  let Json(body) = body?;
  let reg = body.validate()?;

  // Friendly early answer; the store's unique constraint still decides races.
  let existing = state
    .store
    .find_account_by_identity(&reg.identity)
    .await
    .map_err(error::store)?;
  if existing.is_some() {
    return Err(catalog_core::Error::IdentityTaken(reg.identity).into());
  }

  let password_hash = password::hash_secret_blocking(reg.secret).await?;

  let account = state
    .store
    .insert_account(NewAccount {
      name: reg.name,
      identity: reg.identity,
      phone: reg.phone,
      password_hash,
      role: Role::User,
    })
    .await
    .map_err(error::store)?;

  info!(account_id = account.id, "account registered");
  Ok((
    StatusCode::CREATED,
    Json(Message::new("Account created. You can now log in.")),
  ))
}

// ─── Login ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /accounts/login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginBody {
  #[serde(alias = "correo")]
  pub identity: Option<String>,
  #[serde(alias = "contrasena")]
  pub secret:   Option<String>,
}

/// `POST /accounts/login`
///
/// Unknown identity and wrong secret produce the same 401, and both pay for
/// one argon2 verify, so callers cannot tell which e-mail addresses are
/// registered.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), Error>
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  let Json(body) = body?;
  let (Some(identity), Some(secret)) = (present(body.identity), present(body.secret))
  else {
    return Err(Error::Validation("Email and password are required.".into()));
  };

  let account = state
    .store
    .find_account_by_identity(&identity)
    .await
    .map_err(error::store)?;

  let Some(account) = account else {
    password::verify_decoy_blocking(secret).await?;
    warn!("login rejected: unknown identity");
    return Err(Error::bad_credentials());
  };

  if !password::verify_secret_blocking(secret, account.password_hash.clone()).await? {
    warn!(account_id = account.id, "login rejected: wrong secret");
    return Err(Error::bad_credentials());
  }

  let snapshot = AccountSnapshot::from(&account);
  let token = state.sessions.create(snapshot.clone());
  info!(account_id = snapshot.id, role = ?snapshot.role, "session started");

  let jar = jar.add(auth::session_cookie(token, state.sessions.ttl()));
  Ok((jar, Json(LoginResponse { message: "Logged in.", account: snapshot })))
}

// ─── Logout ──────────────────────────────────────────────────────────────────

/// `POST /accounts/logout`: succeeds with or without a session.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
) -> (CookieJar, Json<Message>)
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  if let Some(cookie) = jar.get(auth::SESSION_COOKIE) {
    state.sessions.destroy(cookie.value());
  }
  let jar = jar.remove(auth::cleared_cookie());
  (jar, Json(Message::new("Logged out.")))
}

// ─── Current session ─────────────────────────────────────────────────────────

/// `GET /accounts/session`
pub async fn current(CurrentSession(account): CurrentSession) -> Json<SessionBody> {
  Json(SessionBody { account })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn body(name: &str, identity: &str, secret: &str) -> RegisterBody {
    RegisterBody {
      name:     Some(name.into()),
      identity: Some(identity.into()),
      phone:    None,
      secret:   Some(secret.into()),
    }
  }

  #[test]
  fn registration_requires_fields() {
    assert!(matches!(body("", "a@x.com", "abcd").validate(), Err(Error::Validation(_))));
    assert!(matches!(body("Ana", "  ", "abcd").validate(), Err(Error::Validation(_))));
    assert!(matches!(RegisterBody::default().validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn registration_enforces_secret_length() {
    assert!(matches!(body("Ana", "a@x.com", "abc").validate(), Err(Error::Validation(_))));
    assert!(body("Ana", "a@x.com", "abcd").validate().is_ok());
  }

  #[test]
  fn blank_phone_is_dropped() {
    let mut b = body("Ana", "a@x.com", "abcd");
    b.phone = Some(String::new());
    assert_eq!(b.validate().unwrap().phone, None);
  }

  #[test]
  fn spanish_field_names_are_accepted() {
    let b: RegisterBody = serde_json::from_str(
      r#"{"nombre":"Ana","correo":"a@x.com","celular":"555","contrasena":"abcd"}"#,
    )
    .unwrap();
    let reg = b.validate().unwrap();
    assert_eq!(reg.identity, "a@x.com");
    assert_eq!(reg.phone.as_deref(), Some("555"));
  }
}
