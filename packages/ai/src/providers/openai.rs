//! `OpenAI`-compatible chat completions provider.
//!
//! Used for Groq, `OpenAI`, and self-hosted servers that expose
//! `/chat/completions`.

use serde::{Deserialize, Serialize};

use super::{CompletionRequest, LlmProvider};
use crate::AiError;

/// `OpenAI`-compatible API provider.
pub struct OpenAiProvider {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Creates a new provider. `api_key` may be `None` for local servers.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Result<Self, AiError> {
        Ok(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: super::http_client()?,
        })
    }
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: [OpenAiMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, AiError> {
        let body = OpenAiRequest {
            model: &self.model,
            messages: [
                OpenAiMessage {
                    role: "system",
                    content: request.system_prompt,
                },
                OpenAiMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {api_key}"));
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let err: OpenAiError = serde_json::from_str(&text).unwrap_or_else(|_| OpenAiError {
                error: OpenAiErrorDetail {
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

/// Extracts the first choice's text from a chat completions response.
fn parse_response(body: &str) -> Result<String, AiError> {
    let response: OpenAiResponse = serde_json::from_str(body)?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AiError::Provider {
            message: "No choices in OpenAI response".to_string(),
        })?;

    Ok(choice.message.content.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice_content() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"[]"},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "[]");
    }

    #[test]
    fn null_content_is_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "");
    }

    #[test]
    fn no_choices_is_provider_error() {
        assert!(matches!(
            parse_response(r#"{"choices":[]}"#),
            Err(AiError::Provider { .. })
        ));
    }

    #[test]
    fn serializes_system_then_user() {
        let body = OpenAiRequest {
            model: "llama-3.3-70b-versatile",
            messages: [
                OpenAiMessage {
                    role: "system",
                    content: "sys",
                },
                OpenAiMessage {
                    role: "user",
                    content: "hi",
                },
            ],
            temperature: 0.3,
            max_tokens: 1500,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["max_tokens"], 1500);
    }
}
