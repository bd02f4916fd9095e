#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! LLM provider abstraction and danger zone extraction.
//!
//! Supports Groq and any other `OpenAI`-compatible endpoint (`OpenAI`
//! itself, Ollama, vLLM, llama.cpp, LM Studio via `AI_BASE_URL`) and
//! Anthropic Claude. The [`extractor`] turns a list of headlines into
//! structured [`DangerZone`](danger_zone_models::DangerZone) records with
//! a single low-temperature completion.

pub mod extractor;
pub mod providers;

use thiserror::Error;

/// Errors that can occur during AI operations.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// The model answered, but not with the requested structure.
    #[error("Malformed model output: {message}")]
    Malformed {
        /// What was wrong with it.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}
