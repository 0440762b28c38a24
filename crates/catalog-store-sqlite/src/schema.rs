//! SQL schema for the catalog SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Accounts are insert-only from the service's point of view.
-- The UNIQUE constraint on identity is the final word on duplicates.
-- NOCASE keeps the stored spelling but compares e-mails case-insensitively.
CREATE TABLE IF NOT EXISTS accounts (
    account_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    identity      TEXT NOT NULL UNIQUE COLLATE NOCASE,
    phone         TEXT,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'usuario',  -- 'admin' | 'usuario'
    created_at    TEXT NOT NULL                     -- RFC 3339 UTC, fixed width
);

-- AUTOINCREMENT keeps ids monotonic even after deletes.
CREATE TABLE IF NOT EXISTS courses (
    course_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    instructor  TEXT NOT NULL,
    hours       INTEGER NOT NULL CHECK (hours > 0),
    level       TEXT,                             -- NULL reads back as 'Basic'
    start_date  TEXT NOT NULL,                    -- YYYY-MM-DD
    cost        REAL NOT NULL CHECK (cost >= 0),
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS courses_created_idx ON courses(created_at);

PRAGMA user_version = 1;
";
