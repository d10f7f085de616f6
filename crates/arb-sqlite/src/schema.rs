//! Table layout. Every statement is idempotent, so the whole batch runs on
//! each startup.

pub(crate) const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     INTEGER PRIMARY KEY,
    last_answer TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    relayed_message_id INTEGER NOT NULL UNIQUE,
    user_id            INTEGER NOT NULL REFERENCES users(user_id),
    origin_message_id  INTEGER NOT NULL,
    content_kind       TEXT NOT NULL,   -- 'text' | 'voice' | 'video_note'
    original_text      TEXT,            -- only for 'text'
    response_payload   TEXT,            -- reply text or media file id
    response_kind      TEXT,
    is_read            INTEGER NOT NULL DEFAULT 0,
    created_at         TEXT NOT NULL,
    CHECK (content_kind IN ('text', 'voice', 'video_note')),
    CHECK (response_kind IS NULL OR response_kind IN ('text', 'voice', 'video_note')),
    CHECK ((response_payload IS NULL) = (response_kind IS NULL)),
    CHECK (is_read = 0 OR response_payload IS NOT NULL)
);

CREATE INDEX IF NOT EXISTS idx_messages_user_unread ON messages(user_id, is_read);
";

/// File databases only; in-memory ones cannot use WAL.
pub(crate) const FILE_PRAGMAS: &str = "PRAGMA journal_mode = WAL;";
