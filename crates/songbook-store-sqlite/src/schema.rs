//! SQL schema for the Songbook SQLite store.
//!
//! Executed once at connection startup. `PRAGMA foreign_keys` is a
//! per-connection setting, so it lives here rather than in a migration.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS songs (
    song_id     TEXT PRIMARY KEY,   -- surrogate, never exposed
    group_name  TEXT NOT NULL,
    song_name   TEXT NOT NULL,
    UNIQUE (group_name, song_name)
);

-- Exactly one row per song; created and removed with it.
CREATE TABLE IF NOT EXISTS song_details (
    song_id     TEXT PRIMARY KEY REFERENCES songs(song_id) ON DELETE CASCADE,
    released_at TEXT NOT NULL,      -- YYYY-MM-DD
    link        TEXT NOT NULL
);

-- Verse indices are 1-based and dense; the whole set is replaced on update.
CREATE TABLE IF NOT EXISTS song_verses (
    song_id     TEXT    NOT NULL REFERENCES songs(song_id) ON DELETE CASCADE,
    verse_index INTEGER NOT NULL CHECK (verse_index >= 1),
    verse       TEXT    NOT NULL,
    PRIMARY KEY (song_id, verse_index)
);

CREATE INDEX IF NOT EXISTS song_details_released_idx ON song_details(released_at);

PRAGMA user_version = 1;
";
