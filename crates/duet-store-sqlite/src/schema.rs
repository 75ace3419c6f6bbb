//! SQL schema for the Duet SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// One row per document key. The body is the full JSON envelope
/// (`{version, body}`) and is always replaced as a whole — no UPDATE ever
/// touches part of a value.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS documents (
    key        TEXT PRIMARY KEY,
    body       TEXT NOT NULL,   -- JSON document envelope
    updated_at TEXT NOT NULL    -- ISO 8601 UTC; set on every replace
);

PRAGMA user_version = 1;
";
