/// Recommendation Client — the single point of entry for completion API calls.
///
/// ARCHITECTURAL RULE: No other module may talk to the completion endpoint directly.
/// Callers depend on the `CompletionProvider` capability; `OpenAiClient` is the production
/// implementation and tests substitute a deterministic fake.
///
/// One round trip per call: no retries, no streaming. Transport trouble and unreadable
/// content are reported as two different errors so callers can tell them apart.
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::prompt::CompiledPrompt;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Connection error, timeout, non-2xx status, or a payload that is not a completion.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// The call succeeded but the completion text is not a JSON document.
    #[error("{0}")]
    MalformedResponse(String),
}

/// Everything the client needs to reach the completion endpoint.
/// Built once at startup and handed to the constructor; never read from the environment mid-call.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    /// Ask the endpoint for JSON-only output (`response_format: json_object`).
    pub json_mode: bool,
    pub timeout: Duration,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("json_mode", &self.json_mode)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Capability: send a prompt, get the raw completion text back.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completions client for OpenAI and compatible endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: LlmConfig,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            response_format: self.config.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(model = %self.config.model, prompt_bytes = prompt.len(), "Sending completion request");

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                let detail = if e.is_timeout() {
                    format!("request timed out after {}s", self.config.timeout.as_secs_f32())
                } else {
                    format!("request failed: {e}")
                };
                warn!("Completion call failed: {detail}");
                LlmError::ServiceUnavailable(detail)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Completion API returned {status}: {message}");
            return Err(LlmError::ServiceUnavailable(format!(
                "completion API returned {status}: {message}"
            )));
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            LlmError::ServiceUnavailable(format!("unexpected completion payload: {e}"))
        })?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| LlmError::MalformedResponse("completion contained no text".to_string()))
    }
}

/// Sends the compiled prompt and parses the completion text as JSON.
///
/// `deadline` bounds the whole round trip; expiry is reported as `ServiceUnavailable`.
pub async fn fetch_recommendation(
    provider: &dyn CompletionProvider,
    prompt: &CompiledPrompt,
    deadline: Duration,
) -> Result<Value, LlmError> {
    let text = tokio::time::timeout(deadline, provider.complete(prompt.as_str()))
        .await
        .map_err(|_| {
            LlmError::ServiceUnavailable(format!(
                "no response within {}s",
                deadline.as_secs_f32()
            ))
        })??;

    parse_json_payload(&text)
}

fn parse_json_payload(text: &str) -> Result<Value, LlmError> {
    // Strip markdown code fences if the model wraps JSON in them
    let body = strip_json_fences(text);

    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(80).collect();
        LlmError::MalformedResponse(format!("completion is not JSON ({e}): {preview:?}"))
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
