use futures_util::Stream;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace};

use super::{errors::GenerationError, provider::Generator};

// Endpoints
/// Base of the Gemini REST API
static API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Header carrying the API key; keeps the key out of URLs and logs
static API_KEY_HEADER: &str = "x-goog-api-key";

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Characters escaped in the model path segment
const MODEL_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_');

/// Sampling parameters sent with every request
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.max_output_tokens.is_none()
    }
}

/// Main Gemini client
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    config: GenerationConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: API_BASE.to_string(),
            config: GenerationConfig::default(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url,
            utf8_percent_encode(&self.model, MODEL_SEGMENT),
            method
        )
    }

    fn body<'a>(&self, prompt: &'a str) -> GenerateBody<'a> {
        GenerateBody {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: (!self.config.is_empty()).then_some(self.config),
        }
    }

    /// Post the prompt and check the status; the body is left to the caller
    async fn post(&self, url: &str, prompt: &str) -> Result<reqwest::Response, GenerationError> {
        let body = self.body(prompt);
        trace!(?body);

        let resp = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        debug!(status = %resp.status(), "Gemini responded");

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = api_error_message(&text).unwrap_or(text);
            error!(%status, %message, "Gemini request failed");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp)
    }

    /// Request a streamed answer (server-sent events), see [`super::stream::Streamer`]
    pub async fn stream(
        &self,
        prompt: &str,
    ) -> Result<impl Stream<Item = reqwest::Result<bytes::Bytes>>, GenerationError> {
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        info!(model = %self.model, "Making streaming request");

        let resp = self.post(&url, prompt).await?;
        Ok(resp.bytes_stream())
    }
}

impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        info!(model = %self.model, "Making request");

        let resp = self.post(&self.endpoint("generateContent"), prompt).await?;
        let resp = resp.json::<GenerateResponse>().await?;
        trace!(?resp);

        resp.into_text()
    }
}

fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|e| e.error.message)
}

/// Request body of `generateContent`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateBody<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response of `generateContent`; also each event of `streamGenerateContent`
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateResponse {
    /// Text parts of the first candidate, joined
    pub(crate) fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// The reason the prompt or the answer was blocked, if any
    pub(crate) fn block_reason(&self) -> Option<&str> {
        if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
            return Some(reason);
        }

        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .filter(|reason| matches!(*reason, "SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "RECITATION"))
    }

    pub(crate) fn into_text(self) -> Result<String, GenerationError> {
        let text = self.text();
        if !text.is_empty() {
            return Ok(text);
        }

        match self.block_reason() {
            Some(reason) => Err(GenerationError::Blocked(reason.to_string())),
            None => Err(GenerationError::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).expect("valid response")
    }

    #[test]
    fn joins_text_parts() {
        let resp = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"world"}]},
            "finishReason":"STOP","index":0}],"usageMetadata":{"promptTokenCount":4}}"#,
        );

        assert_eq!(resp.into_text().expect("text"), "Hello world");
    }

    #[test]
    fn blocked_prompt() {
        let resp = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);

        assert!(matches!(resp.into_text(), Err(GenerationError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn blocked_candidate() {
        let resp = parse(r#"{"candidates":[{"finishReason":"SAFETY","index":0}]}"#);

        assert!(matches!(resp.into_text(), Err(GenerationError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn empty_response() {
        assert!(matches!(parse("{}").into_text(), Err(GenerationError::Empty)));
        assert!(matches!(
            parse(r#"{"candidates":[{"content":{"parts":[]},"finishReason":"MAX_TOKENS"}]}"#).into_text(),
            Err(GenerationError::Empty)
        ));
    }

    #[test]
    fn api_error_body() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;

        assert_eq!(api_error_message(body).as_deref(), Some("Resource has been exhausted"));
        assert_eq!(api_error_message("<html>bad gateway</html>"), None);
    }

    #[test]
    fn request_body() {
        let client = GeminiClient::new("key", DEFAULT_MODEL);
        let json = serde_json::to_value(client.body("Napisz post")).expect("serialize body");

        assert_eq!(
            json,
            serde_json::json!({"contents":[{"role":"user","parts":[{"text":"Napisz post"}]}]})
        );

        let client = client.with_generation_config(GenerationConfig {
            temperature: Some(0.5),
            max_output_tokens: Some(512),
        });
        let json = serde_json::to_value(client.body("x")).expect("serialize body");

        assert_eq!(
            json["generationConfig"],
            serde_json::json!({"temperature": 0.5, "maxOutputTokens": 512})
        );
    }

    #[test]
    fn endpoint_escapes_model() {
        let client = GeminiClient::new("key", "gemini-2.5-flash");
        assert_eq!(
            client.endpoint("generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );

        let client = GeminiClient::new("key", "../evil model");
        assert!(!client.endpoint("generateContent").contains("../"));
    }
}
