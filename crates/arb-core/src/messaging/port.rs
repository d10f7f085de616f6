use async_trait::async_trait;

use crate::{
    domain::{ChatId, Content, MediaRef, MessageRef},
    messaging::types::InlineKeyboard,
    Result,
};

/// Outbound transport port.
///
/// Every send returns the transport-assigned message reference; for sends into
/// the moderator chat that id becomes the correlation key. Implementations
/// report failures as `Error::Delivery`.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Plain text, no markup parsing.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;
    async fn send_voice(&self, chat_id: ChatId, media: &MediaRef) -> Result<MessageRef>;
    async fn send_video_note(&self, chat_id: ChatId, media: &MediaRef) -> Result<MessageRef>;

    /// HTML text with an inline keyboard.
    async fn send_menu(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef>;
    /// Replace text and keyboard of an existing message. `None` removes the keyboard.
    async fn edit_menu(
        &self,
        msg: MessageRef,
        html: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()>;

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}

/// Send `content` as-is, dispatching on its kind.
pub async fn send_content(
    messenger: &dyn MessagingPort,
    chat_id: ChatId,
    content: &Content,
) -> Result<MessageRef> {
    match content {
        Content::Text(text) => messenger.send_text(chat_id, text).await,
        Content::Voice(media) => messenger.send_voice(chat_id, media).await,
        Content::VideoNote(media) => messenger.send_video_note(chat_id, media).await,
    }
}
