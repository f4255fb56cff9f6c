use thiserror::Error;

use crate::telegram::TransportError;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Failed to deliver reply: {0}")]
    Transport(#[from] TransportError),
    #[error("Update task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
