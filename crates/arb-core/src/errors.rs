use crate::domain::MessageId;
use crate::texts;

/// Core error type for the relay bot.
///
/// Adapter crates (SQLite, Telegram) map their specific errors into this type
/// so the relay components can decide what, if anything, the user sees.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Storage connectivity, transaction failure or timeout.
    #[error("storage error: {0}")]
    Storage(String),

    /// No correlation record for the given relayed message.
    #[error("no correlation record for relayed message {0}")]
    NotFound(MessageId),

    /// A correlation record already exists for the relayed message.
    #[error("duplicate correlation key: relayed message {0}")]
    DuplicateKey(MessageId),

    /// Transport send failure or timeout.
    #[error("delivery error: {0}")]
    Delivery(String),

    #[error("unsupported content: {0}")]
    UnsupportedContent(String),
}

impl Error {
    /// User-visible text for this failure, or `None` when it stays silent.
    pub fn user_notice(&self) -> Option<&'static str> {
        match self {
            Error::NotFound(_) => None,
            Error::UnsupportedContent(_) => Some(texts::UNSUPPORTED_CONTENT),
            Error::Delivery(_) => Some(texts::DELIVERY_FAILED),
            Error::Storage(_) | Error::DuplicateKey(_) | Error::Config(_) => {
                Some(texts::TEMPORARILY_UNAVAILABLE)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
