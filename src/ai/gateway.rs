//! Provider gateway with primary/secondary failover
//!
//! One "generate text from a prompt" operation resilient to the primary
//! provider being rate-limited, unauthenticated or down: Gemini is attempted
//! exactly once, then the OpenAI-compatible endpoint exactly once. There is
//! deliberately no retry or backoff within a provider, and error
//! classification never changes control flow; the secondary is always tried.

use std::io::{BufRead, BufReader};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use thiserror::Error;
use ureq::Agent;

use crate::config::AiConfig;

use super::parsers::friendly_error;
use super::types::{GenerationOptions, ProviderResult, ProviderUsed};

/// Gateway-level failures, after both providers have been considered
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Neither provider has credentials. Terminal, never retried.
    #[error("no AI providers configured (gemini: not configured, openai: not configured); set GEMINI_API_KEY or OPENAI_API_KEY")]
    NotConfigured,

    /// Both providers were attempted or unavailable; each side's state is
    /// either "not configured" or its normalized failure message
    #[error("all AI providers failed (gemini: {gemini}, openai: {openai})")]
    AllProvidersFailed { gemini: String, openai: String },
}

/// A text-generation backend
///
/// The seam that lets tests stand in for real providers.
pub trait TextProvider: Send + Sync {
    fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Whether [`TextProvider::generate_streaming`] does real streaming
    fn supports_streaming(&self) -> bool {
        false
    }

    /// Stream chunks to `on_chunk`, returning the full accumulated text
    fn generate_streaming(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<String> {
        let _ = (prompt, options, on_chunk);
        bail!("provider does not support streaming")
    }
}

/// Injected provider configuration; no module-level singletons
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub gemini_key: Option<String>,
    pub openai_key: Option<String>,
    pub openai_base_url: String,
    pub gemini_model: String,
    pub openai_model: String,
    pub timeout: Option<Duration>,
}

impl From<&AiConfig> for ProviderConfig {
    fn from(ai: &AiConfig) -> Self {
        Self {
            gemini_key: ai.gemini_key(),
            openai_key: ai.openai_key(),
            openai_base_url: ai.openai_base_url.clone(),
            gemini_model: ai.gemini_model.clone(),
            openai_model: ai.openai_model.clone(),
            timeout: ai.timeout(),
        }
    }
}

fn build_agent(timeout: Option<Duration>) -> Agent {
    // Non-2xx responses are read manually so error bodies can be surfaced
    Agent::config_builder()
        .timeout_global(timeout)
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// The failover gateway
pub struct ProviderGateway {
    primary: Option<Box<dyn TextProvider>>,
    secondary: Option<Box<dyn TextProvider>>,
}

impl ProviderGateway {
    /// Build the gateway from provider configuration
    ///
    /// A provider without a key is simply absent; absence of both is only
    /// reported when a generation is actually attempted.
    pub fn new(config: &ProviderConfig) -> Self {
        let agent = build_agent(config.timeout);

        let primary = config.gemini_key.clone().map(|key| {
            Box::new(GeminiProvider {
                agent: agent.clone(),
                api_key: key,
                model: config.gemini_model.clone(),
            }) as Box<dyn TextProvider>
        });

        let secondary = config.openai_key.clone().map(|key| {
            Box::new(OpenAiCompatProvider {
                agent: agent.clone(),
                api_key: key,
                base_url: config.openai_base_url.trim_end_matches('/').to_string(),
                model: config.openai_model.clone(),
            }) as Box<dyn TextProvider>
        });

        Self { primary, secondary }
    }

    /// Construct with explicit providers (test seam)
    pub fn with_providers(
        primary: Option<Box<dyn TextProvider>>,
        secondary: Option<Box<dyn TextProvider>>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Generate text, trying primary then secondary
    ///
    /// Fails only when both providers fail or neither is configured.
    pub fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<ProviderResult, GatewayError> {
        if self.primary.is_none() && self.secondary.is_none() {
            return Err(GatewayError::NotConfigured);
        }

        let mut gemini_state = String::from("not configured");
        if let Some(primary) = &self.primary {
            match primary.generate(prompt, options) {
                Ok(text) => {
                    return Ok(ProviderResult {
                        text,
                        provider_used: ProviderUsed::Primary,
                    });
                }
                // Classification feeds the diagnostic only; the secondary
                // is attempted next no matter what went wrong here
                Err(e) => gemini_state = friendly_error(&e),
            }
        }

        let mut openai_state = String::from("not configured");
        if let Some(secondary) = &self.secondary {
            let options = rewrite_for_secondary(options);
            match secondary.generate(prompt, &options) {
                Ok(text) => {
                    return Ok(ProviderResult {
                        text,
                        provider_used: ProviderUsed::Secondary,
                    });
                }
                Err(e) => openai_state = friendly_error(&e),
            }
        }

        Err(GatewayError::AllProvidersFailed {
            gemini: gemini_state,
            openai: openai_state,
        })
    }

    /// Whether the primary provider can stream
    pub fn supports_streaming(&self) -> bool {
        self.primary
            .as_ref()
            .is_some_and(|p| p.supports_streaming())
    }

    /// Stream from the primary provider; errors if it cannot stream
    pub fn stream_primary(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<String> {
        let primary = self
            .primary
            .as_ref()
            .filter(|p| p.supports_streaming())
            .context("primary provider does not support streaming")?;
        primary.generate_streaming(prompt, options, on_chunk)
    }
}

/// Rewrite a model hint in the primary's namespace before a fallback call
///
/// The two providers use incompatible model catalogs; a "gemini-*" hint
/// would be rejected by the secondary, so it falls back to that provider's
/// default model instead.
pub fn rewrite_for_secondary(options: &GenerationOptions) -> GenerationOptions {
    let mut rewritten = options.clone();
    if rewritten
        .model_hint
        .as_deref()
        .is_some_and(|m| m.starts_with("gemini"))
    {
        rewritten.model_hint = None;
    }
    rewritten
}

/// Pull a short message out of a provider error body, falling back to the
/// raw body when it is not the expected `{"error": {"message": ...}}` shape
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.len() > 200 {
                format!("{}...", &trimmed[..200])
            } else {
                trimmed.to_string()
            }
        })
}

// ---------------------------------------------------------------------------
// Gemini (primary)
// ---------------------------------------------------------------------------

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

struct GeminiProvider {
    agent: Agent,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    fn request_body(&self, prompt: &str, options: &GenerationOptions) -> Value {
        json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": options.temperature_or_default(),
                "maxOutputTokens": options.max_tokens_or_default(),
            }
        })
    }

    fn model_for(&self, options: &GenerationOptions) -> String {
        let model = options.model_hint.as_deref().unwrap_or(&self.model);
        urlencoding::encode(model).into_owned()
    }

    /// Concatenate the text parts of one response candidate
    fn candidate_text(value: &Value) -> String {
        value["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl TextProvider for GeminiProvider {
    fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent",
            GEMINI_API_BASE,
            self.model_for(options)
        );

        let mut response = self
            .agent
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .send_json(self.request_body(prompt, options))
            .context("Gemini request failed")?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .context("Failed to read Gemini response")?;

        if !(200..300).contains(&status) {
            bail!("Gemini returned status {}: {}", status, api_error_message(&body));
        }

        let value: Value =
            serde_json::from_str(&body).context("Gemini response is not valid JSON")?;
        let text = Self::candidate_text(&value);
        if text.trim().is_empty() {
            bail!("Gemini returned an empty response");
        }

        Ok(text)
    }

    fn supports_streaming(&self) -> bool {
        true
    }

    fn generate_streaming(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<String> {
        let url = format!(
            "{}/{}:streamGenerateContent?alt=sse",
            GEMINI_API_BASE,
            self.model_for(options)
        );

        let mut response = self
            .agent
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .send_json(self.request_body(prompt, options))
            .context("Gemini stream request failed")?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            bail!("Gemini returned status {}: {}", status, api_error_message(&body));
        }

        let reader = BufReader::new(response.into_body().into_reader());
        let mut accumulated = String::new();

        for line in reader.lines() {
            let line = line.context("Gemini stream interrupted")?;
            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            let data = data.trim();
            if data.is_empty() || data == "[DONE]" {
                continue;
            }

            // Tolerate malformed events; the stream carries keep-alives
            let Ok(value) = serde_json::from_str::<Value>(data) else {
                continue;
            };

            let chunk = Self::candidate_text(&value);
            if !chunk.is_empty() {
                accumulated.push_str(&chunk);
                on_chunk(&chunk);
            }
        }

        if accumulated.trim().is_empty() {
            bail!("Gemini stream produced no text");
        }

        Ok(accumulated)
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible chat completions (secondary)
// ---------------------------------------------------------------------------

struct OpenAiCompatProvider {
    agent: Agent,
    api_key: String,
    base_url: String,
    model: String,
}

impl TextProvider for OpenAiCompatProvider {
    fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let model = options.model_hint.as_deref().unwrap_or(&self.model);

        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(json!({
                "model": model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": options.temperature_or_default(),
                "max_tokens": options.max_tokens_or_default(),
            }))
            .context("OpenAI request failed")?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .context("Failed to read OpenAI response")?;

        if !(200..300).contains(&status) {
            bail!("OpenAI returned status {}: {}", status, api_error_message(&body));
        }

        #[derive(serde::Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }
        #[derive(serde::Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }
        #[derive(serde::Deserialize)]
        struct ChatMessage {
            content: String,
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).context("OpenAI response is not valid JSON")?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            bail!("OpenAI returned an empty response");
        }

        Ok(text)
    }
}
