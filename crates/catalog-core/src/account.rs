//! Accounts and the identity snapshot a session carries.
//!
//! Accounts are created once (self-registration or admin provisioning) and
//! never updated by this service. A session holds an [`AccountSnapshot`], a
//! copy taken at login, so later changes to the row never alter a live
//! session's claimed role.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum number of characters a secret must have at registration.
pub const MIN_SECRET_LEN: usize = 4;

// ─── Role ────────────────────────────────────────────────────────────────────

/// What an account may do. Self-registration always yields [`Role::User`];
/// admins are provisioned out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  #[default]
  User,
}

impl Role {
  pub fn is_admin(self) -> bool { matches!(self, Self::Admin) }
}

// ─── Account ─────────────────────────────────────────────────────────────────

/// A persisted account. Deliberately not `Serialize`: the hash never leaves
/// the server.
#[derive(Clone)]
pub struct Account {
  pub id:            i64,
  pub name:          String,
  /// E-mail address; unique and case-preserving.
  pub identity:      String,
  pub phone:         Option<String>,
  /// PHC string produced by the password hasher.
  pub password_hash: String,
  pub role:          Role,
  pub created_at:    DateTime<Utc>,
}

impl fmt::Debug for Account {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Account")
      .field("id", &self.id)
      .field("name", &self.name)
      .field("identity", &self.identity)
      .field("phone", &self.phone)
      .field("password_hash", &"<redacted>")
      .field("role", &self.role)
      .field("created_at", &self.created_at)
      .finish()
  }
}

/// Input to [`crate::store::CatalogStore::insert_account`].
/// `id` and `created_at` are assigned by the store.
#[derive(Clone)]
pub struct NewAccount {
  pub name:          String,
  pub identity:      String,
  pub phone:         Option<String>,
  pub password_hash: String,
  pub role:          Role,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// The identity claims captured into a session at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
  pub id:       i64,
  pub name:     String,
  pub identity: String,
  pub role:     Role,
}

impl From<&Account> for AccountSnapshot {
  fn from(a: &Account) -> Self {
    Self {
      id:       a.id,
      name:     a.name.clone(),
      identity: a.identity.clone(),
      role:     a.role,
    }
  }
}
