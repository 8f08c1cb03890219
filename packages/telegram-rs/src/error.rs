//! Error types for the Bot API client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TelegramError>;

#[derive(Debug, Error)]
pub enum TelegramError {
    /// Transport failure (connection refused, timeout, bad TLS). The request
    /// URL is stripped, since it carries the bot token.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The Bot API answered `ok: false`
    #[error("Bot API error {status}: {description}")]
    Api { status: u16, description: String },

    /// `ok: true` without a `result` field
    #[error("Bot API returned no result for {0}")]
    MissingResult(&'static str),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::Http(err.without_url())
    }
}
