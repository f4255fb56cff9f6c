//! Telegram Bot API transport.
mod api;
mod errors;
pub mod types;

use std::{future::Future, time::Duration};

pub use api::TelegramClient;
pub use errors::TransportError;

/// Maximum length of one Telegram message, in UTF-16 code units
pub const MESSAGE_LIMIT: usize = 4096;

/// Delivers replies to a chat
pub trait Transport: Send + Sync {
    /// Send one message; callers keep it within [`MESSAGE_LIMIT`] with [`split_message`]
    fn send_message(&self, chat_id: i64, text: &str) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Show the "typing..." indicator; it fades after a few seconds
    fn send_typing(&self, chat_id: i64) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Where inbound updates come from
pub trait UpdateSource: Send + Sync {
    /// Long-poll for new updates. `offset` is one past the last update already handled.
    fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<types::Update>, TransportError>> + Send;
}

/// Split `text` into parts of at most `limit` UTF-16 code units, the unit Telegram
/// counts in, cutting after the last newline of a part when there is one.
/// Parts never split a character. Joining the parts gives back `text`.
pub fn split_message(text: &str, limit: usize) -> Vec<&str> {
    let mut parts = vec![];
    let mut rest = text;

    while !rest.is_empty() {
        let cut = match fitting_prefix(rest, limit) {
            end if end == rest.len() => end,
            // A single character wider than the limit still has to go somewhere
            0 => rest.chars().next().map_or(rest.len(), char::len_utf8),
            end => match rest[..end].rfind('\n') {
                Some(newline) if newline > 0 => newline + 1,
                _ => end,
            },
        };

        parts.push(&rest[..cut]);
        rest = &rest[cut..];
    }

    parts
}

/// Byte length of the longest prefix of `text` within `limit` UTF-16 code units
fn fitting_prefix(text: &str, limit: usize) -> usize {
    let mut units = 0;
    for (i, c) in text.char_indices() {
        units += c.len_utf16();
        if units > limit {
            return i;
        }
    }
    text.len()
}
