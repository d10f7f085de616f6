use crate::domain::{ChatId, Content, MessageId, MessageRef, UserId};

/// Transport-agnostic inbound event.
///
/// Telegram-specific fields stay in the Telegram adapter.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(Command),
    NewMessage(NewMessage),
    ReplyMessage(ReplyMessage),
    ButtonPress(ButtonPress),
}

/// A `/name` message. `text` keeps the full message so unknown commands can
/// still be treated as ordinary text.
#[derive(Clone, Debug)]
pub struct Command {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub from_user_id: UserId,
    pub name: String,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct NewMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub from_user_id: UserId,
    pub content: IncomingContent,
}

/// A message sent as an explicit reply to another message in the same chat.
#[derive(Clone, Debug)]
pub struct ReplyMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub from_user_id: UserId,
    pub replied_to_message_id: MessageId,
    pub content: IncomingContent,
}

#[derive(Clone, Debug)]
pub struct ButtonPress {
    pub from_user_id: UserId,
    pub callback_id: String,
    pub callback_data: String,
    /// The menu message the button belongs to, when the transport still has it.
    pub message: Option<MessageRef>,
}

/// Inbound payload as seen by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncomingContent {
    Supported(Content),
    /// Anything else (photo, sticker, document...). `kind` is a short label for logs.
    Unsupported { kind: String },
}

impl From<Content> for IncomingContent {
    fn from(c: Content) -> Self {
        IncomingContent::Supported(c)
    }
}

impl ReplyMessage {
    /// View the reply as a plain new message (replies in private chats).
    pub fn into_new_message(self) -> NewMessage {
        NewMessage {
            chat_id: self.chat_id,
            message_id: self.message_id,
            from_user_id: self.from_user_id,
            content: self.content,
        }
    }
}

/// Inline keyboard laid out in rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }
}
