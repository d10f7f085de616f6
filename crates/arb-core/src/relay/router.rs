use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    domain::{ChatId, Content, ContentKind, MessageId, UserId},
    errors::Error,
    messaging::{
        port::{send_content, MessagingPort},
        types::IncomingContent,
    },
    relay::send_headed_text,
    store::{CorrelationStore, NewCorrelation},
    texts, Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Id of the forwarded copy in the moderator chat; the correlation key.
    pub relayed_message_id: MessageId,
    pub content_kind: ContentKind,
}

/// Forwards user content into the moderator chat and registers the correlation.
pub struct RelayRouter {
    moderator_chat: ChatId,
    store: Arc<dyn CorrelationStore>,
    messenger: Arc<dyn MessagingPort>,
}

impl RelayRouter {
    pub fn new(
        moderator_chat: ChatId,
        store: Arc<dyn CorrelationStore>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            moderator_chat,
            store,
            messenger,
        }
    }

    /// Forward first, then write. A forward failure leaves storage untouched.
    ///
    /// A storage failure after a successful forward leaves an untracked
    /// message in the moderator chat; it is not retracted.
    pub async fn relay(
        &self,
        user_id: UserId,
        origin_message_id: MessageId,
        content: &IncomingContent,
    ) -> Result<RelayOutcome> {
        let content = match content {
            IncomingContent::Supported(c) => c,
            IncomingContent::Unsupported { kind } => {
                return Err(Error::UnsupportedContent(kind.clone()));
            }
        };

        let forwarded = match content {
            Content::Text(text) => {
                send_headed_text(
                    self.messenger.as_ref(),
                    self.moderator_chat,
                    texts::ANONYMOUS_MESSAGE_HEADER,
                    text,
                )
                .await
            }
            media => send_content(self.messenger.as_ref(), self.moderator_chat, media).await,
        }
        .map_err(|e| {
            warn!(user_id = user_id.0, kind = %content.kind(), error = %e, "forward to moderator chat failed");
            e
        })?;
        let relayed_message_id = forwarded.message_id;

        let stored = async {
            self.store.ensure_user(user_id).await?;
            self.store
                .create_correlation(NewCorrelation::for_content(
                    relayed_message_id,
                    user_id,
                    origin_message_id,
                    content,
                ))
                .await
        }
        .await;

        match stored {
            Ok(()) => {
                info!(
                    user_id = user_id.0,
                    relayed_message_id = relayed_message_id.0,
                    kind = %content.kind(),
                    "relayed user message"
                );
                Ok(RelayOutcome {
                    relayed_message_id,
                    content_kind: content.kind(),
                })
            }
            Err(e @ Error::DuplicateKey(_)) => {
                error!(
                    relayed_message_id = relayed_message_id.0,
                    "transport reused a message id already used as a correlation key"
                );
                Err(e)
            }
            Err(e) => {
                error!(
                    user_id = user_id.0,
                    relayed_message_id = relayed_message_id.0,
                    error = %e,
                    "correlation write failed; forwarded message is untracked"
                );
                Err(e)
            }
        }
    }
}
