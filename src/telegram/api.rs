use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, trace};

use super::{
    Transport, UpdateSource,
    errors::TransportError,
    types::{ApiResponse, Update},
};

/// Base of the Bot API; the token goes right after `/bot`
static API_BASE: &str = "https://api.telegram.org";
/// Extra time given to a long poll on top of its own timeout
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Thin async client for the Bot API methods used by the bot
#[derive(Clone)]
pub struct TelegramClient {
    token: String,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: API_BASE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<T, TransportError> {
        trace!(method, ?body, "Calling Bot API");

        let mut req = self.client.post(self.url(method)).json(body);
        if let Some(timeout) = timeout {
            req = req.timeout(timeout);
        }

        let resp = req.send().await?.json::<ApiResponse<T>>().await?;
        check(method, resp)
    }
}

impl UpdateSource for TelegramClient {
    async fn get_updates(&self, offset: Option<i64>, timeout: Duration) -> Result<Vec<Update>, TransportError> {
        let mut body = json!({
            "timeout": timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }

        self.call("getUpdates", &body, Some(timeout + POLL_GRACE)).await
    }
}

fn check<T>(method: &str, resp: ApiResponse<T>) -> Result<T, TransportError> {
    if !resp.ok {
        return Err(TransportError::Api {
            method: method.to_string(),
            description: resp.description.unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    resp.result.ok_or_else(|| TransportError::Api {
        method: method.to_string(),
        description: "response without result".to_string(),
    })
}

impl Transport for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        debug!(chat_id, len = text.len(), "Sending message");
        let body = json!({ "chat_id": chat_id, "text": text });
        self.call::<serde_json::Value>("sendMessage", &body, None).await?;
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<(), TransportError> {
        let body = json!({ "chat_id": chat_id, "action": "typing" });
        self.call::<bool>("sendChatAction", &body, None).await?;
        Ok(())
    }
}
