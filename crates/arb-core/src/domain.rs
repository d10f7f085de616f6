use std::fmt;

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric). Negative for groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric, unique per chat).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl UserId {
    /// The private chat with a user shares the user's id.
    pub fn private_chat(self) -> ChatId {
        ChatId(self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-side handle to an uploaded media file (Telegram `file_id`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaRef(pub String);

/// The kinds of content the relay accepts and stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    Voice,
    VideoNote,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Voice => "voice",
            ContentKind::VideoNote => "video_note",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(ContentKind::Text),
            "voice" => Some(ContentKind::Voice),
            "video_note" => Some(ContentKind::VideoNote),
            _ => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relayable content: a user's question or a moderator's answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Voice(MediaRef),
    VideoNote(MediaRef),
}

impl Content {
    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Text(_) => ContentKind::Text,
            Content::Voice(_) => ContentKind::Voice,
            Content::VideoNote(_) => ContentKind::VideoNote,
        }
    }

    /// Stored form: the text itself, or the media reference.
    pub fn payload(&self) -> &str {
        match self {
            Content::Text(t) => t,
            Content::Voice(m) | Content::VideoNote(m) => &m.0,
        }
    }

    /// Text body, only for `Text`.
    pub fn text(&self) -> Option<&str> {
        match self {
            Content::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Rebuild content from its stored `(payload, kind)` pair.
    pub fn from_stored(payload: String, kind: ContentKind) -> Self {
        match kind {
            ContentKind::Text => Content::Text(payload),
            ContentKind::Voice => Content::Voice(MediaRef(payload)),
            ContentKind::VideoNote => Content::VideoNote(MediaRef(payload)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_kind_round_trips_through_storage_names() {
        for kind in [ContentKind::Text, ContentKind::Voice, ContentKind::VideoNote] {
            assert_eq!(ContentKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ContentKind::parse("sticker"), None);
    }

    #[test]
    fn media_payload_is_the_file_reference() {
        let c = Content::VideoNote(MediaRef("file-42".to_string()));
        assert_eq!(c.payload(), "file-42");
        assert_eq!(c.text(), None);
        assert_eq!(
            Content::from_stored("file-42".to_string(), ContentKind::VideoNote),
            c
        );
    }
}
