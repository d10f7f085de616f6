use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    domain::{Content, MessageId, UserId},
    errors::Error,
    messaging::port::MessagingPort,
    relay::deliver_response,
    store::CorrelationStore,
    texts, Result,
};

/// Routes a moderator reply back to the user who asked.
pub struct ReplyResolver {
    store: Arc<dyn CorrelationStore>,
    messenger: Arc<dyn MessagingPort>,
}

impl ReplyResolver {
    pub fn new(store: Arc<dyn CorrelationStore>, messenger: Arc<dyn MessagingPort>) -> Self {
        Self { store, messenger }
    }

    /// Store the reply against `replied_to_message_id` and push it to the user.
    ///
    /// Returns `None` when the replied-to message is not a tracked relay.
    /// A failed push is logged only: the response stays unread and is offered
    /// again on the user's next pending check.
    pub async fn resolve_reply(
        &self,
        replied_to_message_id: MessageId,
        content: &Content,
    ) -> Result<Option<UserId>> {
        let user_id = match self
            .store
            .record_response(replied_to_message_id, content)
            .await
        {
            Ok(user_id) => user_id,
            Err(Error::NotFound(_)) => {
                debug!(
                    replied_to_message_id = replied_to_message_id.0,
                    "reply to untracked message ignored"
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        info!(
            user_id = user_id.0,
            relayed_message_id = replied_to_message_id.0,
            kind = %content.kind(),
            "moderator reply recorded"
        );

        if let Err(e) = deliver_response(
            self.messenger.as_ref(),
            user_id,
            content,
            texts::LIVE_RESPONSE_HEADER,
        )
        .await
        {
            warn!(user_id = user_id.0, error = %e, "reply push failed; kept for next check");
        }

        Ok(Some(user_id))
    }
}
