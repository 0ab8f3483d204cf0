//! Response normalization and parsing
//!
//! Shared helpers for stripping markdown fences from model output, parsing
//! JSON leniently, classifying provider errors, and extracting dollar
//! figures from free-text fields.

use anyhow::{Context, Result, bail};
use regex::Regex;

use super::types::{RawBudgetResponse, RawMissingTool, RawReplacement};

/// Strip a leading ```` ```json ```` / ```` ``` ```` and trailing ```` ``` ````
/// if present; no-op otherwise. Idempotent.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Extract a JSON object from a response that might contain extra text
pub fn extract_json_object(response: &str) -> Result<String> {
    let start = response
        .find('{')
        .context("No JSON object found in response")?;
    let end = response
        .rfind('}')
        .context("No closing brace found in response")?;

    if end <= start {
        bail!("Invalid JSON structure in response");
    }

    Ok(response[start..=end].to_string())
}

/// Extract a JSON array from a response that might contain extra text
pub fn extract_json_array(response: &str) -> Result<String> {
    let start = response
        .find('[')
        .context("No JSON array found in response")?;
    let end = response
        .rfind(']')
        .context("No closing bracket found in response")?;

    if end <= start {
        bail!("Invalid JSON structure in response");
    }

    Ok(response[start..=end].to_string())
}

/// Parse the replacement-suggestions response
pub fn parse_replacement_response(response: &str) -> Result<Vec<RawReplacement>> {
    let json_str = extract_json_array(strip_code_fence(response))?;
    serde_json::from_str(&json_str).context("Failed to parse replacement response as JSON")
}

/// Parse the missing-tools response
pub fn parse_missing_response(response: &str) -> Result<Vec<RawMissingTool>> {
    let json_str = extract_json_array(strip_code_fence(response))?;
    serde_json::from_str(&json_str).context("Failed to parse missing-tools response as JSON")
}

/// Parse the budget-alternatives response
pub fn parse_budget_response(response: &str) -> Result<RawBudgetResponse> {
    let json_str = extract_json_object(strip_code_fence(response))?;
    serde_json::from_str(&json_str).context("Failed to parse budget response as JSON")
}

/// Extract the first dollar figure from free text like "$45.00/month"
///
/// The models return money as strings in inconsistent formats, so this is a
/// numeric-only regex pull rather than a real currency parser.
pub fn extract_money(text: &str) -> Option<f64> {
    // Compiled per call; money extraction is nowhere near hot
    let re = Regex::new(r"-?\d+(?:,\d{3})*(?:\.\d+)?").ok()?;
    let m = re.find(text)?;
    m.as_str().replace(',', "").parse().ok()
}

/// Broad classification of a provider error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimit,
    AuthFailure,
    Generic,
}

/// Classify a provider error by keyword sniffing
///
/// Upstream SDKs are inconsistent about where they put status information,
/// so both the display message and the debug dump are scanned. The result
/// feeds human-readable messages only; the gateway tries both providers
/// regardless of classification.
pub fn classify_error(error: &anyhow::Error) -> ErrorKind {
    let haystack = format!("{error} {error:?}").to_lowercase();

    if haystack.contains("429")
        || haystack.contains("quota")
        || haystack.contains("rate limit")
        || haystack.contains("resource exhausted")
    {
        return ErrorKind::RateLimit;
    }

    if haystack.contains("401")
        || haystack.contains("api key")
        || haystack.contains("authentication")
    {
        return ErrorKind::AuthFailure;
    }

    ErrorKind::Generic
}

/// Short human-readable rendering of a provider error
pub fn friendly_error(error: &anyhow::Error) -> String {
    match classify_error(error) {
        ErrorKind::RateLimit => "rate limit exceeded, try again shortly".to_string(),
        ErrorKind::AuthFailure => "invalid API key".to_string(),
        ErrorKind::Generic => format!("{error}"),
    }
}
