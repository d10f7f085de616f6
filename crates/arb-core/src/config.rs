use std::{env, fs, path::Path, path::PathBuf, time::Duration};

use crate::{domain::ChatId, errors::Error, Result};

/// Typed configuration for the relay bot.
#[derive(Clone, Debug)]
pub struct Config {
    // Required
    pub telegram_bot_token: String,
    pub moderator_chat_id: ChatId,
    pub database_path: PathBuf,

    // Timeouts
    pub storage_timeout: Duration,
    pub transport_timeout: Duration,
}

impl Config {
    /// Load from the process environment (and `.env`, if present).
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;

        let raw_chat = lookup("MODERATOR_CHAT_ID")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("MODERATOR_CHAT_ID environment variable is required".to_string())
            })?;
        let moderator_chat_id = raw_chat.trim().parse::<i64>().map(ChatId).map_err(|_| {
            Error::Config(format!("MODERATOR_CHAT_ID must be an integer, got {raw_chat:?}"))
        })?;

        let database_path = lookup("DATABASE_PATH")
            .and_then(non_empty)
            .map(|s| parse_database_path(&s))
            .ok_or_else(|| {
                Error::Config("DATABASE_PATH environment variable is required".to_string())
            })?;

        let storage_timeout =
            Duration::from_millis(parse_u64(lookup("STORAGE_TIMEOUT_MS")).unwrap_or(5_000));
        let transport_timeout =
            Duration::from_millis(parse_u64(lookup("TRANSPORT_TIMEOUT_MS")).unwrap_or(15_000));

        Ok(Self {
            telegram_bot_token,
            moderator_chat_id,
            database_path,
            storage_timeout,
            transport_timeout,
        })
    }
}

/// Accepts a bare path or a `sqlite://` URL.
fn parse_database_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let path = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    PathBuf::from(path)
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        env::set_var(key, unquote(v.trim()));
    }
}

fn unquote(val: &str) -> &str {
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        &val[1..val.len() - 1]
    } else {
        val
    }
}

fn parse_u64(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
