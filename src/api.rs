// Answer client: builds an OpenAI-style chat completion request carrying the
// prompt prefix and the screenshot data URL, POSTs it to the configured
// endpoint and pulls the answer text out of the JSON reply. Every expected
// failure is turned into a printable string so the session loop keeps going.

use crate::config::Config;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Returned when the reply is valid JSON without `choices[0].message.content`.
pub const NO_ANSWER: &str = "No answer in response";

/// Request body. Serializes to
/// `{"model": .., "messages": [{"role": "user", "content": [..]}]}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatRequest {
    /// A single user message: the prompt text, then the image.
    pub fn new(model: &str, prompt: &str, image_data_url: &str) -> Self {
        ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: vec![
                    ContentPart::Text { text: prompt.to_string() },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: image_data_url.to_string() },
                    },
                ],
            }],
        }
    }
}

/// Failures the client reports as text instead of propagating.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("Error communicating with AI API: {0}")]
    Transport(String),
    #[error("Error decoding JSON response from AI API.")]
    Decode,
}

/// Sends a request body and hands back the raw response text. An `Err`
/// means the request never produced a usable response (connection failure,
/// timeout, non-success HTTP status).
pub trait Transport {
    fn post_json(&self, url: &str, api_key: &str, body: &ChatRequest) -> Result<String>;
}

/// `Transport` over a blocking reqwest client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, api_key: &str, body: &ChatRequest) -> Result<String> {
        // `.json` sets Content-Type: application/json
        let res = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(body)
            .send()?;
        log::debug!("AI API responded with {}", res.status());
        let res = res.error_for_status()?;
        Ok(res.text()?)
    }
}

/// Asks the completion endpoint about one screenshot per call.
pub struct AnswerClient<T> {
    transport: T,
}

impl<T: Transport> AnswerClient<T> {
    pub fn new(transport: T) -> Self {
        AnswerClient { transport }
    }

    /// Send the prompt prefix and image; always returns something to print.
    pub fn ask(&self, config: &Config, image_data_url: &str) -> String {
        self.try_ask(config, image_data_url)
            .unwrap_or_else(|e| e.to_string())
    }

    fn try_ask(&self, config: &Config, image_data_url: &str) -> Result<String, AskError> {
        log::info!("Using API endpoint: {}", config.base_url);
        let body = ChatRequest::new(&config.model, &config.prompt_prefix, image_data_url);
        let text = self
            .transport
            .post_json(&config.base_url, &config.api_key, &body)
            .map_err(|e| AskError::Transport(format!("{e:#}")))?;
        let reply: Value = serde_json::from_str(&text).map_err(|e| {
            log::debug!("Response body is not JSON: {e}");
            AskError::Decode
        })?;
        Ok(extract_answer(&reply))
    }
}

/// `choices[0].message.content`, or `NO_ANSWER` if any step is missing.
/// Non-string content is returned as its JSON text.
pub fn extract_answer(reply: &Value) -> String {
    match reply.pointer("/choices/0/message/content") {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => NO_ANSWER.to_string(),
        Some(other) => other.to_string(),
    }
}
