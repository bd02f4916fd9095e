//! Danger zone extraction from news headlines.
//!
//! Headlines are sent to the model as a 1-based numbered list together with
//! a fixed JSON schema. The model's answer is treated as untrusted: a code
//! fence is unwrapped if present, every field except `location` is
//! optional, and cited headline numbers outside the list are dropped.
//! Nothing here fails past [`extract_zones`]: a broken model means no
//! zones, not an error response.

use std::str::FromStr;
use std::sync::LazyLock;

use danger_zone_models::{DangerZone, Headline, RiskType, Severity};
use regex::Regex;

use crate::AiError;
use crate::providers::{CompletionRequest, LlmProvider};

/// System instruction for the extraction call.
pub const SYSTEM_PROMPT: &str = "Always respond with valid JSON only.";

/// Low temperature keeps the output close to the schema.
pub const TEMPERATURE: f32 = 0.3;

/// Token cap for the extraction call.
pub const MAX_TOKENS: u32 = 1500;

/// A fenced block with an optional language tag, e.g. `` ```json ``.
static FENCED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)```").unwrap()
});

/// An opening fence that the model never closed (usually truncation).
static UNCLOSED_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*)$").unwrap()
});

/// Builds the user prompt: numbered headlines plus the output contract.
#[must_use]
pub fn build_prompt(headlines: &[Headline], city: &str) -> String {
    let headlines_text = headlines
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{}. {}", i + 1, h.title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
You are a safety analyst. Based on the following news headlines from {city}, identify danger or alert locations.

Headlines:
{headlines_text}

Return ONLY valid JSON with this structure:
[
  {{
    "location": "specific area name, {city}",
    "risk_type": "Flood/Fire/Crime/Accident/Protest/Weather",
    "severity": "High/Medium/Low",
    "description": "brief summary",
    "headline_number": [1, 2]
  }}
]
If no threats found, return [].
"#
    )
}

/// Returns the content of the first code fence in `text`, without its
/// language tag. Unfenced text is returned trimmed.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(inner) = FENCED.captures(trimmed).and_then(|c| c.get(1)) {
        return inner.as_str().trim();
    }
    if let Some(inner) = UNCLOSED_FENCE.captures(trimmed).and_then(|c| c.get(1)) {
        return inner.as_str().trim();
    }
    trimmed
}

/// Maps 1-based headline numbers to titles, dropping anything that is not
/// a positive integer within `[1, headlines.len()]`.
fn related_headlines(numbers: &serde_json::Value, headlines: &[Headline]) -> Vec<String> {
    let numbers = match numbers {
        serde_json::Value::Array(items) => items.as_slice(),
        single @ serde_json::Value::Number(_) => std::slice::from_ref(single),
        _ => &[],
    };

    numbers
        .iter()
        .filter_map(serde_json::Value::as_u64)
        .filter_map(|n| usize::try_from(n).ok())
        .filter(|&n| (1..=headlines.len()).contains(&n))
        .map(|n| headlines[n - 1].title.clone())
        .collect()
}

fn parse_label<T: FromStr>(value: &serde_json::Value) -> Option<T> {
    value.as_str().and_then(|s| s.trim().parse().ok())
}

/// Converts one model item into a zone. Items without a usable `location`
/// cannot be geocoded and are skipped.
fn to_zone(item: &serde_json::Value, headlines: &[Headline]) -> Option<DangerZone> {
    let location = item.get("location")?.as_str()?.trim();
    if location.is_empty() {
        return None;
    }

    Some(DangerZone {
        location: location.to_string(),
        risk_type: parse_label::<RiskType>(&item["risk_type"]),
        severity: parse_label::<Severity>(&item["severity"]),
        description: item["description"].as_str().map(String::from),
        related_headlines: related_headlines(&item["headline_number"], headlines),
    })
}

/// Parses the model's raw answer into zones.
///
/// # Errors
///
/// Returns [`AiError::Json`] if the (unfenced) text is not JSON, or
/// [`AiError::Malformed`] if it is not a JSON array.
pub fn parse_zones(text: &str, headlines: &[Headline]) -> Result<Vec<DangerZone>, AiError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(text))?;

    let items = value.as_array().ok_or_else(|| AiError::Malformed {
        message: format!("expected a JSON array, got {}", json_kind(&value)),
    })?;

    let zones: Vec<DangerZone> = items
        .iter()
        .filter_map(|item| {
            let zone = to_zone(item, headlines);
            if zone.is_none() {
                log::debug!("Skipping zone without a location: {item}");
            }
            zone
        })
        .collect();

    Ok(zones)
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Asks the model which places in `city` the headlines point to.
///
/// Returns an empty list without calling the model when there are no
/// headlines. Model errors, empty answers, and unparseable answers are
/// logged and also yield an empty list.
pub async fn extract_zones(
    llm: &dyn LlmProvider,
    headlines: &[Headline],
    city: &str,
) -> Vec<DangerZone> {
    if headlines.is_empty() {
        return Vec::new();
    }

    let prompt = build_prompt(headlines, city);
    let request = CompletionRequest {
        system_prompt: SYSTEM_PROMPT,
        prompt: &prompt,
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    };

    let answer = match llm.complete(&request).await {
        Ok(answer) => answer,
        Err(e) => {
            log::warn!("Error analyzing headlines for {city}: {e}");
            return Vec::new();
        }
    };

    if answer.trim().is_empty() {
        log::warn!("Model returned an empty answer for {city}");
        return Vec::new();
    }

    match parse_zones(&answer, headlines) {
        Ok(zones) => {
            log::info!("Identified {} danger zones in {city}", zones.len());
            zones
        }
        Err(e) => {
            log::warn!("Could not parse model answer for {city}: {e}");
            Vec::new()
        }
    }
}
