use teloxide::types::Message;

use arb_core::{
    domain::{ChatId, Content, MediaRef, MessageId, UserId},
    messaging::types::{Command, IncomingContent, IncomingUpdate, NewMessage, ReplyMessage},
    relay::service::COMMANDS,
};

pub(super) fn to_update(msg: &Message) -> Option<IncomingUpdate> {
    let from = msg.from()?;
    let from_user_id = UserId(from.id.0 as i64);
    let chat_id = ChatId(msg.chat.id.0);
    let message_id = MessageId(msg.id.0);

    if let Some(text) = msg.text() {
        if let Some(name) = known_command(text) {
            return Some(IncomingUpdate::Command(Command {
                chat_id,
                message_id,
                from_user_id,
                name,
                text: text.to_string(),
            }));
        }
    }

    let content = content_of(msg);
    Some(match msg.reply_to_message() {
        Some(replied) => IncomingUpdate::ReplyMessage(ReplyMessage {
            chat_id,
            message_id,
            from_user_id,
            replied_to_message_id: MessageId(replied.id.0),
            content,
        }),
        None => IncomingUpdate::NewMessage(NewMessage {
            chat_id,
            message_id,
            from_user_id,
            content,
        }),
    })
}

fn content_of(msg: &Message) -> IncomingContent {
    if let Some(text) = msg.text() {
        return Content::Text(text.to_string()).into();
    }
    if let Some(voice) = msg.voice() {
        return Content::Voice(MediaRef(voice.file.id.clone())).into();
    }
    if let Some(note) = msg.video_note() {
        return Content::VideoNote(MediaRef(note.file.id.clone())).into();
    }

    let kind = if msg.photo().is_some() {
        "photo"
    } else if msg.video().is_some() {
        "video"
    } else if msg.document().is_some() {
        "document"
    } else if msg.sticker().is_some() {
        "sticker"
    } else if msg.audio().is_some() {
        "audio"
    } else if msg.animation().is_some() {
        "animation"
    } else {
        "other"
    };
    IncomingContent::Unsupported {
        kind: kind.to_string(),
    }
}

/// Only known commands are split off, so "/help ..." from a user or "/ok"
/// from a moderator is handled as ordinary text.
fn known_command(text: &str) -> Option<String> {
    command_name(text).filter(|name| COMMANDS.contains(&name.as_str()))
}

/// `/start@SomeBot arg` -> `start`. The name must follow the slash directly.
fn command_name(text: &str) -> Option<String> {
    let rest = text.strip_prefix('/')?;
    let word = rest.split(char::is_whitespace).next().unwrap_or_default();
    let name = word.split('@').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some(name.to_lowercase())
}
