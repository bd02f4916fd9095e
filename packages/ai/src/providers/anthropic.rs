//! Anthropic Claude provider implementation.

use serde::{Deserialize, Serialize};

use super::{CompletionRequest, LlmProvider};
use crate::AiError;

/// Anthropic Claude API provider.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: String, model: String) -> Result<Self, AiError> {
        Ok(Self {
            api_key,
            model,
            client: super::http_client()?,
        })
    }
}

/// Anthropic API request body.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [AnthropicMessage<'a>; 1],
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Anthropic API response body.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Anthropic API error response.
#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, AiError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system_prompt,
            messages: [AnthropicMessage {
                role: "user",
                content: request.prompt,
            }],
        };

        let resp = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let err: AnthropicError =
                serde_json::from_str(&text).unwrap_or_else(|_| AnthropicError {
                    error: AnthropicErrorDetail {
                        message: format!("HTTP {status}: {text}"),
                    },
                });
            return Err(AiError::Provider {
                message: err.error.message,
            });
        }

        parse_response(&text)
    }
}

/// Concatenates the text blocks of a Messages API response.
fn parse_response(body: &str) -> Result<String, AiError> {
    let response: AnthropicResponse = serde_json::from_str(body)?;
    Ok(response
        .content
        .into_iter()
        .filter_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text),
            AnthropicContentBlock::Other => None,
        })
        .collect::<Vec<_>>()
        .join(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_blocks() {
        let body = r#"{"id":"msg_1","type":"message","role":"assistant","content":[{"type":"text","text":"[{\"location\":"},{"type":"text","text":"\"Goa\"}]"}],"stop_reason":"end_turn"}"#;
        assert_eq!(parse_response(body).unwrap(), r#"[{"location":"Goa"}]"#);
    }

    #[test]
    fn ignores_non_text_blocks() {
        let body = r#"{"content":[{"type":"thinking","thinking":"hmm"},{"type":"text","text":"[]"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "[]");
    }
}
