//! LLM provider abstraction and implementations.
//!
//! Supports `OpenAI`-compatible chat completions (Groq, `OpenAI`, local
//! servers) and Anthropic via a common trait.

pub mod anthropic;
pub mod openai;

use std::time::Duration;

use crate::AiError;

/// A single-turn completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// System instruction.
    pub system_prompt: &'a str,
    /// User message.
    pub prompt: &'a str,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

/// Trait for LLM providers.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Runs one completion and returns the assistant's text, which may be
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails.
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, AiError>;
}

/// Per-request timeout for completion calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn http_client() -> Result<reqwest::Client, AiError> {
    Ok(reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Creates an LLM provider based on environment variables.
///
/// If `AI_PROVIDER` is explicitly set, uses that provider. Otherwise
/// auto-detects from available credentials:
///
/// 1. `GROQ_API_KEY` set -> Groq (`llama-3.3-70b-versatile`)
/// 2. `ANTHROPIC_API_KEY` set -> Anthropic Claude
/// 3. `OPENAI_API_KEY` or `AI_BASE_URL` set -> `OpenAI`-compatible
///
/// `AI_MODEL` overrides the model and `AI_BASE_URL` the endpoint of
/// `OpenAI`-compatible providers.
///
/// # Errors
///
/// Returns [`AiError::Config`] if no credentials are found or the
/// explicitly requested provider is not configured.
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, AiError> {
    create_provider(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
}

/// Builds a provider from a variable lookup (the environment, in
/// production).
fn create_provider(
    var: impl Fn(&str) -> Option<String>,
) -> Result<Box<dyn LlmProvider>, AiError> {
    let provider = var("AI_PROVIDER").unwrap_or_else(|| detect_provider(&var));
    let model = var("AI_MODEL");

    match provider.to_lowercase().as_str() {
        "groq" => {
            let api_key = var("GROQ_API_KEY").ok_or_else(|| AiError::Config {
                message: "GROQ_API_KEY environment variable not set".to_string(),
            })?;
            let base_url = var("AI_BASE_URL").unwrap_or_else(|| GROQ_BASE_URL.to_string());
            let model = model.unwrap_or_else(|| "llama-3.3-70b-versatile".to_string());
            log::info!("Using Groq model {model}");
            Ok(Box::new(openai::OpenAiProvider::new(
                Some(api_key),
                model,
                base_url,
            )?))
        }
        "openai" | "gpt" => {
            let api_key = var("OPENAI_API_KEY");
            let base_url = var("AI_BASE_URL");
            if api_key.is_none() && base_url.is_none() {
                return Err(AiError::Config {
                    message: "OPENAI_API_KEY environment variable not set".to_string(),
                });
            }
            let model = model.unwrap_or_else(|| "gpt-4o".to_string());
            let base_url = base_url.unwrap_or_else(|| OPENAI_BASE_URL.to_string());
            log::info!("Using OpenAI-compatible model {model} at {base_url}");
            Ok(Box::new(openai::OpenAiProvider::new(api_key, model, base_url)?))
        }
        "anthropic" | "claude" => {
            let api_key = var("ANTHROPIC_API_KEY").ok_or_else(|| AiError::Config {
                message: "ANTHROPIC_API_KEY environment variable not set".to_string(),
            })?;
            let model = model.unwrap_or_else(|| "claude-sonnet-4-20250514".to_string());
            log::info!("Using Anthropic model {model}");
            Ok(Box::new(anthropic::AnthropicProvider::new(api_key, model)?))
        }
        other => Err(AiError::Config {
            message: format!("Unknown AI provider: {other}. Use 'groq', 'openai', or 'anthropic'."),
        }),
    }
}

/// Auto-detects which provider to use based on available credentials.
///
/// Returns a provider name string that matches the arms in
/// [`create_provider`].
fn detect_provider(var: &impl Fn(&str) -> Option<String>) -> String {
    if var("GROQ_API_KEY").is_some() {
        log::info!("Auto-detected AI provider: Groq (GROQ_API_KEY found)");
        return "groq".to_string();
    }

    if var("ANTHROPIC_API_KEY").is_some() {
        log::info!("Auto-detected AI provider: Anthropic (ANTHROPIC_API_KEY found)");
        return "anthropic".to_string();
    }

    if var("OPENAI_API_KEY").is_some() || var("AI_BASE_URL").is_some() {
        log::info!("Auto-detected AI provider: OpenAI-compatible");
        return "openai".to_string();
    }

    log::warn!(
        "No AI credentials detected. Set one of: GROQ_API_KEY, ANTHROPIC_API_KEY, \
         OPENAI_API_KEY, or AI_BASE_URL. You can also set AI_PROVIDER explicitly."
    );

    // Fall back to groq, which will produce a clear error about the missing key
    "groq".to_string()
}
