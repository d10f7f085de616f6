//! Correlation Store port.
//!
//! The store is the only holder of durable state. Implementations must make
//! each operation commit fully or not at all.

use async_trait::async_trait;

use crate::{
    domain::{Content, ContentKind, MessageId, UserId},
    Result,
};

/// Input to `create_correlation`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCorrelation {
    pub relayed_message_id: MessageId,
    pub user_id: UserId,
    pub origin_message_id: MessageId,
    pub content_kind: ContentKind,
    /// Only for `ContentKind::Text`.
    pub original_text: Option<String>,
}

impl NewCorrelation {
    pub fn for_content(
        relayed_message_id: MessageId,
        user_id: UserId,
        origin_message_id: MessageId,
        content: &Content,
    ) -> Self {
        Self {
            relayed_message_id,
            user_id,
            origin_message_id,
            content_kind: content.kind(),
            original_text: content.text().map(str::to_string),
        }
    }
}

/// A stored correlation record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationRecord {
    pub relayed_message_id: MessageId,
    pub user_id: UserId,
    pub origin_message_id: MessageId,
    pub content_kind: ContentKind,
    pub original_text: Option<String>,
    /// Moderator reply, payload and kind together.
    pub response: Option<Content>,
    pub is_read: bool,
    /// RFC3339, UTC.
    pub created_at: String,
}

impl CorrelationRecord {
    /// A response exists and has not been delivered through a pending check.
    pub fn is_pending(&self) -> bool {
        self.response.is_some() && !self.is_read
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: UserId,
    pub last_answer: Option<String>,
    pub created_at: String,
}

#[async_trait]
pub trait CorrelationStore: Send + Sync {
    /// Insert the user if absent.
    async fn ensure_user(&self, user_id: UserId) -> Result<()>;

    /// Insert a new record. `Error::DuplicateKey` if the relayed id is taken;
    /// the store is left unchanged in that case.
    async fn create_correlation(&self, record: NewCorrelation) -> Result<()>;

    /// Attach (or overwrite) the response, reset `is_read` and refresh the
    /// owner's `last_answer`. `Error::NotFound` for unknown keys.
    async fn record_response(&self, relayed_message_id: MessageId, response: &Content)
        -> Result<UserId>;

    /// Claim every pending response of `user_id`, oldest first, marking them
    /// read in the same transaction.
    async fn fetch_and_mark_pending(&self, user_id: UserId) -> Result<Vec<Content>>;

    async fn correlation(&self, relayed_message_id: MessageId)
        -> Result<Option<CorrelationRecord>>;

    async fn user(&self, user_id: UserId) -> Result<Option<UserRecord>>;
}
