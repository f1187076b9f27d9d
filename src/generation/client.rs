// src/generation/client.rs
//! Thin wrapper over the OpenAI chat-completions API. One request per row,
//! no internal retries: retry policy belongs to the layer above.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::prompt::build_prompt;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Models offered in the settings popup.
pub const AVAILABLE_MODELS: [&str; 4] = [
    "gpt-3.5-turbo",
    "gpt-3.5-turbo-16k",
    "gpt-4o-mini",
    "gpt-4o",
];

/// Fixed system instruction establishing the assistant's persona and language.
const SYSTEM_PROMPT: &str = "შენ ხარ ქართველი მარკეტინგის ასისტენტი და კოპირაიტერი.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("response contained no completion")]
    EmptyCompletion,
}

/// Call parameters carried alongside each request; sourced from settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client holding the credential explicitly; nothing reads ambient state.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl GenerationClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_api_base(api_key, DEFAULT_API_BASE)
    }

    /// Tests point this at a local mock server.
    pub fn with_api_base(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into(),
        }
    }

    /// Generates one advertisement. Suspends at the network boundary; never
    /// blocks the calling thread.
    pub async fn generate_ad(
        &self,
        name: &str,
        description: &str,
        tone_key: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        let prompt = build_prompt(name, description, tone_key);
        let request = ChatCompletionRequest {
            model: &params.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .map(|detail| detail.message)
                .unwrap_or_else(|| body.trim().to_string());
            return Err(GenerationError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyCompletion)
    }

    /// Lightweight credential check: listing models is the cheapest
    /// authenticated call the service offers.
    pub async fn validate_key(&self) -> bool {
        let response = self
            .http
            .get(format!("{}/models", self.api_base))
            .bearer_auth(&self.api_key)
            .send()
            .await;
        match response {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
