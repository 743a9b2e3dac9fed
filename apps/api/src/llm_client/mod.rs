/// LLM Client — the single point of entry for chat-completion calls in Letterdesk.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// All generation requests MUST go through `CompletionProvider`.
///
/// One request per call. No retries: a failed generation is reported back to
/// the user, who decides whether to try again.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// The model used for every cover letter.
/// Hardcoded so that letters stay comparable across sessions.
pub const MODEL: &str = "gpt-3.5-turbo";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 1000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Anything that can turn a (system, prompt) pair into letter text.
///
/// Carried in `AppState` as `Arc<dyn CompletionProvider>` so tests can swap
/// in scripted providers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issues exactly one completion request authorised by `api_key` and
    /// returns the text of the first choice, or `""` when the provider answers
    /// 2xx with an unexpected shape.
    async fn complete(&self, api_key: &str, system: &str, prompt: &str)
        -> Result<String, LlmError>;
}

/// OpenAI-compatible `/chat/completions` client.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    base_url: String,
}

impl ChatCompletionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    async fn complete(
        &self,
        api_key: &str,
        system: &str,
        prompt: &str,
    ) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Every non-2xx is the same failure to the caller; keep the
            // provider's message for the logs only.
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = serde_json::from_str(&body)?;

        if let Some(usage) = value.get("usage") {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage["prompt_tokens"], usage["completion_tokens"]
            );
        }

        Ok(first_choice_text(&value).to_string())
    }
}

/// Text of `choices[0].message.content`, or `""` if any step is missing.
pub fn first_choice_text(value: &Value) -> &str {
    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
}
