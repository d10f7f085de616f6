use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    domain::UserId, messaging::port::MessagingPort, relay::deliver_response,
    store::CorrelationStore, texts, Result,
};

/// "Check responses": claims a user's unread replies and delivers them.
pub struct PendingResponses {
    store: Arc<dyn CorrelationStore>,
    messenger: Arc<dyn MessagingPort>,
}

impl PendingResponses {
    pub fn new(store: Arc<dyn CorrelationStore>, messenger: Arc<dyn MessagingPort>) -> Self {
        Self { store, messenger }
    }

    /// Returns how many responses were claimed, whether or not each send
    /// succeeded. Claimed responses are already marked read; a failed send is
    /// not retried.
    pub async fn check(&self, user_id: UserId) -> Result<usize> {
        let pending = self.store.fetch_and_mark_pending(user_id).await?;

        for (idx, response) in pending.iter().enumerate() {
            if let Err(e) = deliver_response(
                self.messenger.as_ref(),
                user_id,
                response,
                texts::RESPONSE_HEADER,
            )
            .await
            {
                warn!(
                    user_id = user_id.0,
                    idx,
                    kind = %response.kind(),
                    error = %e,
                    "pending response delivery failed"
                );
            }
        }

        if !pending.is_empty() {
            info!(user_id = user_id.0, count = pending.len(), "delivered pending responses");
        }
        Ok(pending.len())
    }
}
