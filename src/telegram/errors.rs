use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The URL is stripped from the error because it contains the bot token
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
    #[error("Telegram API error in `{method}`: {description}")]
    Api { method: String, description: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}
