//! SQL schema for the Secret Santa SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS people (
    person_id   TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    slug        TEXT NOT NULL UNIQUE,   -- fixed at creation
    created_at  TEXT NOT NULL
);

-- One row per giver per year. Rows go when either endpoint is deleted.
CREATE TABLE IF NOT EXISTS assignments (
    assignment_id TEXT PRIMARY KEY,
    giver_id      TEXT NOT NULL REFERENCES people(person_id) ON DELETE CASCADE,
    recipient_id  TEXT NOT NULL REFERENCES people(person_id) ON DELETE CASCADE,
    year          INTEGER NOT NULL,
    created_at    TEXT NOT NULL,
    UNIQUE (giver_id, year),
    CHECK  (giver_id != recipient_id),
    CHECK  (year > 0)
);

CREATE INDEX IF NOT EXISTS assignments_year_idx      ON assignments(year);
CREATE INDEX IF NOT EXISTS assignments_recipient_idx ON assignments(recipient_id);

PRAGMA user_version = 1;
";
