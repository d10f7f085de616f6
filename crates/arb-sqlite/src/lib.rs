//! SQLite-backed Correlation Store.
//!
//! All statements go through tokio-rusqlite's single background connection,
//! so calls are serialised; multi-statement operations additionally run in
//! one transaction each.

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, types::Type, OptionalExtension, TransactionBehavior};
use tokio_rusqlite::Connection;
use tracing::info;

use arb_core::{
    domain::{Content, ContentKind, MessageId, UserId},
    errors::Error,
    store::{CorrelationRecord, CorrelationStore, NewCorrelation, UserRecord},
    Result,
};

mod schema;

/// Outcome of the insert inside `create_correlation`.
enum Inserted {
    Yes,
    DuplicateKey,
}

#[derive(Clone)]
pub struct SqliteStore {
    conn: Connection,
    timeout: Duration,
}

impl SqliteStore {
    /// Open (or create) the database file and apply the schema.
    pub async fn open(path: impl AsRef<Path>, timeout: Duration) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .await
            .map_err(|e| Error::Storage(format!("open {}: {e}", path.display())))?;
        let store = Self { conn, timeout };
        store
            .call("init", |conn| conn.execute_batch(schema::FILE_PRAGMAS))
            .await?;
        store.init().await?;
        info!(path = %path.display(), "correlation store ready");
        Ok(store)
    }

    pub async fn open_in_memory(timeout: Duration) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Storage(format!("open in-memory: {e}")))?;
        let store = Self { conn, timeout };
        store.init().await?;
        Ok(store)
    }

    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| Error::Storage(format!("close: {e}")))
    }

    async fn init(&self) -> Result<()> {
        self.call("init", |conn| conn.execute_batch(schema::SCHEMA))
            .await
    }

    /// Run `f` on the connection thread, bounded by the storage timeout.
    ///
    /// A timed-out call is reported as `Error::Storage`, but the statement may
    /// still complete in the background.
    async fn call<R, F>(&self, op: &'static str, f: F) -> Result<R>
    where
        F: FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        match tokio::time::timeout(self.timeout, self.conn.call(f)).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => Err(Error::Storage(format!("{op}: {e}"))),
            Err(_) => Err(Error::Storage(format!(
                "{op} timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_kind(idx: usize, raw: &str) -> rusqlite::Result<ContentKind> {
    ContentKind::parse(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown content kind {raw:?}").into(),
        )
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

const RECORD_COLUMNS: &str = "relayed_message_id, user_id, origin_message_id, content_kind, \
     original_text, response_payload, response_kind, is_read, created_at";

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CorrelationRecord> {
    let content_kind: String = row.get(3)?;
    let payload: Option<String> = row.get(5)?;
    let response_kind: Option<String> = row.get(6)?;
    let response = match (payload, response_kind) {
        (Some(p), Some(k)) => Some(Content::from_stored(p, parse_kind(6, &k)?)),
        _ => None,
    };

    Ok(CorrelationRecord {
        relayed_message_id: MessageId(row.get(0)?),
        user_id: UserId(row.get(1)?),
        origin_message_id: MessageId(row.get(2)?),
        content_kind: parse_kind(3, &content_kind)?,
        original_text: row.get(4)?,
        response,
        is_read: row.get(7)?,
        created_at: row.get(8)?,
    })
}

#[async_trait]
impl CorrelationStore for SqliteStore {
    async fn ensure_user(&self, user_id: UserId) -> Result<()> {
        let created_at = now();
        self.call("ensure_user", move |conn| {
            conn.execute(
                "INSERT INTO users (user_id, created_at) VALUES (?1, ?2)
                 ON CONFLICT(user_id) DO NOTHING",
                params![user_id.0, created_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn create_correlation(&self, record: NewCorrelation) -> Result<()> {
        let key = record.relayed_message_id;
        let created_at = now();
        let inserted = self
            .call("create_correlation", move |conn| {
                let res = conn.execute(
                    "INSERT INTO messages (relayed_message_id, user_id, origin_message_id,
                                           content_kind, original_text, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        record.relayed_message_id.0,
                        record.user_id.0,
                        record.origin_message_id.0,
                        record.content_kind.as_str(),
                        record.original_text,
                        created_at,
                    ],
                );
                match res {
                    Ok(_) => Ok(Inserted::Yes),
                    Err(e) if is_unique_violation(&e) => Ok(Inserted::DuplicateKey),
                    Err(e) => Err(e),
                }
            })
            .await?;

        match inserted {
            Inserted::Yes => Ok(()),
            Inserted::DuplicateKey => Err(Error::DuplicateKey(key)),
        }
    }

    async fn record_response(
        &self,
        relayed_message_id: MessageId,
        response: &Content,
    ) -> Result<UserId> {
        let payload = response.payload().to_string();
        let kind = response.kind();
        let owner = self
            .call("record_response", move |conn| {
                let tx = conn.transaction()?;
                let owner: Option<i64> = tx
                    .query_row(
                        "SELECT user_id FROM messages WHERE relayed_message_id = ?1",
                        params![relayed_message_id.0],
                        |row| row.get(0),
                    )
                    .optional()?;
                let Some(owner) = owner else {
                    return Ok(None);
                };

                tx.execute(
                    "UPDATE messages
                     SET response_payload = ?1, response_kind = ?2, is_read = 0
                     WHERE relayed_message_id = ?3",
                    params![payload, kind.as_str(), relayed_message_id.0],
                )?;
                tx.execute(
                    "UPDATE users SET last_answer = ?1 WHERE user_id = ?2",
                    params![payload, owner],
                )?;
                tx.commit()?;
                Ok(Some(owner))
            })
            .await?;

        owner
            .map(UserId)
            .ok_or(Error::NotFound(relayed_message_id))
    }

    async fn fetch_and_mark_pending(&self, user_id: UserId) -> Result<Vec<Content>> {
        self.call("fetch_and_mark_pending", move |conn| {
            // IMMEDIATE takes the write lock up front so the read and the
            // marking see the same snapshot.
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let candidates: Vec<(i64, String, String)> = {
                let mut stmt = tx.prepare(
                    "SELECT id, response_payload, response_kind
                     FROM messages
                     WHERE user_id = ?1 AND is_read = 0 AND response_payload IS NOT NULL
                     ORDER BY created_at ASC, id ASC",
                )?;
                let rows = stmt
                    .query_map(params![user_id.0], |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            };

            let mut claimed = Vec::with_capacity(candidates.len());
            for (id, payload, kind) in candidates {
                let changed = tx.execute(
                    "UPDATE messages SET is_read = 1
                     WHERE id = ?1 AND is_read = 0 AND response_payload IS NOT NULL",
                    params![id],
                )?;
                if changed == 1 {
                    claimed.push(Content::from_stored(payload, parse_kind(2, &kind)?));
                }
            }
            tx.commit()?;
            Ok(claimed)
        })
        .await
    }

    async fn correlation(&self, relayed_message_id: MessageId) -> Result<Option<CorrelationRecord>> {
        self.call("correlation", move |conn| {
            conn.query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM messages WHERE relayed_message_id = ?1"),
                params![relayed_message_id.0],
                record_from_row,
            )
            .optional()
        })
        .await
    }

    async fn user(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        self.call("user", move |conn| {
            conn.query_row(
                "SELECT user_id, last_answer, created_at FROM users WHERE user_id = ?1",
                params![user_id.0],
                |row| {
                    Ok(UserRecord {
                        user_id: UserId(row.get(0)?),
                        last_answer: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()
        })
        .await
    }
}
