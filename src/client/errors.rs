use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Response blocked: {0}")]
    Blocked(String),
    #[error("Empty response")]
    Empty,
    #[error("Failed to process stream: {0}")]
    Stream(String),
    #[error("Failed to (de)serialize: {0}")]
    Json(#[from] serde_json::Error),
}
