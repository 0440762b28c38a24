//! Server-side session table.
//!
//! A session maps an opaque token to the [`AccountSnapshot`] captured at login.
//! Each session lives for a fixed TTL from creation; there is no sliding
//! renewal. Expiry is checked when a token is resolved. A periodic
//! [`SessionManager::purge_expired`] pass only reclaims memory, and whether it
//! has run never changes what `resolve` returns.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use catalog_core::account::AccountSnapshot;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use rand_core::{OsRng, RngCore as _};

/// Default session lifetime: four hours.
pub const DEFAULT_TTL_SECS: i64 = 4 * 60 * 60;

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
struct Entry {
  snapshot:   AccountSnapshot,
  expires_at: DateTime<Utc>,
}

impl Entry {
  fn is_live(&self, now: DateTime<Utc>) -> bool { now < self.expires_at }
}

/// Token → snapshot table shared by every request handler.
#[derive(Debug)]
pub struct SessionManager {
  entries: DashMap<String, Entry>,
  ttl:     TimeDelta,
}

impl Default for SessionManager {
  fn default() -> Self { Self::new(TimeDelta::seconds(DEFAULT_TTL_SECS)) }
}

impl SessionManager {
  pub fn new(ttl: TimeDelta) -> Self { Self { entries: DashMap::new(), ttl } }

  pub fn ttl(&self) -> TimeDelta { self.ttl }

  /// Start a session for `snapshot` and return its token.
  pub fn create(&self, snapshot: AccountSnapshot) -> String {
    self.create_at(snapshot, Utc::now())
  }

  pub fn create_at(&self, snapshot: AccountSnapshot, now: DateTime<Utc>) -> String {
    let token = generate_token();
    self.entries.insert(token.clone(), Entry { snapshot, expires_at: now + self.ttl });
    token
  }

  /// The snapshot bound to `token`, or `None` if the token is unknown or its
  /// session has expired.
  pub fn resolve(&self, token: &str) -> Option<AccountSnapshot> {
    self.resolve_at(token, Utc::now())
  }

  pub fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Option<AccountSnapshot> {
    match self.entries.get(token) {
      None => return None,
      Some(entry) if entry.is_live(now) => return Some(entry.snapshot.clone()),
      Some(_) => {}
    }
    // The read guard is dropped above; evict without deadlocking the shard.
    self.entries.remove_if(token, |_, entry| !entry.is_live(now));
    None
  }

  /// End the session for `token`. Unknown tokens are ignored.
  pub fn destroy(&self, token: &str) { self.entries.remove(token); }

  /// Drop every session expired at `now`; returns how many were removed.
  pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
    let mut purged = 0;
    self.entries.retain(|_, entry| {
      let live = entry.is_live(now);
      if !live {
        purged += 1;
      }
      live
    });
    purged
  }

  /// Number of sessions held, expired or not.
  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

fn generate_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
  use super::*;
  use catalog_core::account::Role;

  fn snapshot(role: Role) -> AccountSnapshot {
    AccountSnapshot {
      id:       1,
      name:     "Ana".into(),
      identity: "ana@example.com".into(),
      role,
    }
  }

  fn minutes(m: i64) -> TimeDelta { TimeDelta::minutes(m) }

  #[test]
  fn resolves_until_ttl_elapses() {
    let sessions = SessionManager::default();
    let t = Utc::now();
    let token = sessions.create_at(snapshot(Role::User), t);

    let just_before = t + TimeDelta::hours(3) + minutes(59);
    let just_after  = t + TimeDelta::hours(4) + minutes(1);

    assert_eq!(sessions.resolve_at(&token, just_before), Some(snapshot(Role::User)));
    assert_eq!(sessions.resolve_at(&token, just_after), None);
  }

  #[test]
  fn expired_session_is_evicted_on_read() {
    let sessions = SessionManager::new(minutes(10));
    let t = Utc::now();
    let token = sessions.create_at(snapshot(Role::User), t);
    assert_eq!(sessions.len(), 1);

    assert!(sessions.resolve_at(&token, t + minutes(11)).is_none());
    assert!(sessions.is_empty());
    // Once expired, an earlier clock cannot bring it back.
    assert!(sessions.resolve_at(&token, t).is_none());
  }

  #[test]
  fn unknown_token_resolves_to_none() {
    let sessions = SessionManager::default();
    assert!(sessions.resolve("no-such-token").is_none());
  }

  #[test]
  fn destroy_is_idempotent() {
    let sessions = SessionManager::default();
    let token = sessions.create(snapshot(Role::Admin));

    sessions.destroy(&token);
    sessions.destroy(&token);
    sessions.destroy("never-existed");
    assert!(sessions.resolve(&token).is_none());
  }

  #[test]
  fn tokens_are_distinct_and_opaque() {
    let sessions = SessionManager::default();
    let a = sessions.create(snapshot(Role::User));
    let b = sessions.create(snapshot(Role::User));

    assert_ne!(a, b);
    assert_eq!(a.len(), 43, "32 bytes, unpadded base64url");
    assert!(!a.contains("ana"));
    assert_eq!(sessions.len(), 2, "one account may hold several sessions");
  }

  #[test]
  fn purge_removes_only_expired_entries() {
    let sessions = SessionManager::new(minutes(30));
    let t = Utc::now();
    let old = sessions.create_at(snapshot(Role::User), t);
    let fresh = sessions.create_at(snapshot(Role::Admin), t + minutes(20));

    assert_eq!(sessions.purge_expired(t + minutes(40)), 1);
    assert!(sessions.resolve_at(&old, t + minutes(40)).is_none());
    assert_eq!(
      sessions.resolve_at(&fresh, t + minutes(40)).map(|s| s.role),
      Some(Role::Admin)
    );
  }
}
