//! Relay application logic: forwarding user content to the moderator chat,
//! resolving moderator replies, and delivering stored responses.

pub mod conversation;
pub mod menu;
pub mod pending;
pub mod resolver;
pub mod router;
pub mod service;

#[cfg(test)]
pub(crate) mod fakes;

use crate::{
    domain::{ChatId, Content, MessageRef, UserId},
    messaging::port::MessagingPort,
    texts, Result,
};

/// Send `body` under `header` as one message, or as two when together they
/// would exceed the transport's length limit. Returns the message carrying
/// `body`.
pub(crate) async fn send_headed_text(
    messenger: &dyn MessagingPort,
    chat_id: ChatId,
    header: &str,
    body: &str,
) -> Result<MessageRef> {
    let joined = format!("{header}\n\n{body}");
    if joined.encode_utf16().count() <= texts::MAX_MESSAGE_LEN {
        return messenger.send_text(chat_id, &joined).await;
    }
    messenger.send_text(chat_id, header).await?;
    messenger.send_text(chat_id, body).await
}

/// Deliver a moderator response to its user's private chat.
///
/// Text is sent under `header`; media is sent as-is followed by the fixed
/// annotation for its kind.
pub(crate) async fn deliver_response(
    messenger: &dyn MessagingPort,
    user_id: UserId,
    response: &Content,
    header: &str,
) -> Result<()> {
    let chat_id = user_id.private_chat();
    match response {
        Content::Text(text) => {
            send_headed_text(messenger, chat_id, header, text).await?;
        }
        Content::Voice(media) => {
            messenger.send_voice(chat_id, media).await?;
            messenger
                .send_text(chat_id, texts::VOICE_RESPONSE_ANNOTATION)
                .await?;
        }
        Content::VideoNote(media) => {
            messenger.send_video_note(chat_id, media).await?;
            messenger
                .send_text(chat_id, texts::VIDEO_NOTE_RESPONSE_ANNOTATION)
                .await?;
        }
    }
    Ok(())
}
