//! The subset of Telegram Bot API objects the bot reads.

use serde::Deserialize;

/// Envelope of every Bot API response
#[derive(Deserialize, Debug)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

impl Update {
    /// Chat id and text of a text message; `None` for every other kind of update
    pub fn text_message(&self) -> Option<(i64, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((message.chat.id, text))
    }
}

#[derive(Deserialize, Debug)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Chat {
    pub id: i64,
}

#[derive(Deserialize, Debug)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}
