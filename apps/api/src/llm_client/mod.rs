/// LLM Client: the single point of entry for generative-model calls.
///
/// No other module talks to the Anthropic API directly. The optimizer depends
/// on the `ChatCompletion` trait, so tests can swap in a canned backend.
///
/// One request per call. Failures are returned, never retried: callers fall
/// back to deterministic logic instead.
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Hardcoded to keep optimizer output stable across deployments.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.4;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("Invalid regex: fenced block"));

static OBJECT_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("Invalid regex: object literal"));

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that can answer a system + user prompt pair with text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete_chat(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Text of the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
        })
    }

    /// Makes one call to the Messages API and returns the full response.
    pub async fn call(&self, system: &str, prompt: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn complete_chat(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(system, prompt).await?;
        response
            .text()
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Locates the JSON payload in model output: the body of the first fenced code
/// block, else the span from the first `{` to the last `}`, else the whole text.
pub fn extract_json_payload(text: &str) -> &str {
    if let Some(body) = FENCED_BLOCK.captures(text).and_then(|c| c.get(1)) {
        return body.as_str().trim();
    }
    OBJECT_LITERAL
        .find(text)
        .map_or(text, |m| m.as_str())
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_payload_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_payload(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_payload_without_tag() {
        let input = "Here you go:\n```\n{\"key\": \"value\"}\n```\nThanks";
        assert_eq!(extract_json_payload(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_payload_from_prose() {
        let input = "Sure! {\"summary\": \"x\", \"nested\": {\"a\": 1}} Hope that helps.";
        assert_eq!(
            extract_json_payload(input),
            "{\"summary\": \"x\", \"nested\": {\"a\": 1}}"
        );
    }

    #[test]
    fn test_extract_payload_no_json() {
        assert_eq!(extract_json_payload("  no json here "), "no json here");
    }

    #[test]
    fn test_response_text_picks_first_text_block() {
        let response: LlmResponse = serde_json::from_value(serde_json::json!({
            "content": [
                {"type": "tool_use"},
                {"type": "text", "text": "hello"}
            ],
            "usage": {"input_tokens": 3, "output_tokens": 1}
        }))
        .unwrap();
        assert_eq!(response.text(), Some("hello"));
    }
}
