//! Transport abstractions (Telegram today).

pub mod port;
pub mod timeout;
pub mod types;
