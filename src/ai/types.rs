//! Types for the AI pipeline
//!
//! Request options, gateway results, and the recommendation shapes the
//! alternatives generator assembles from the three AI sources.

use serde::{Deserialize, Serialize};

/// Tuning knobs passed to the provider gateway
///
/// Absent fields get per-feature defaults (temperature 0.7, max tokens 1024
/// for prose, 2048 for structured JSON features).
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Preferred model; hints in the primary's namespace are rewritten
    /// before a fallback call since the two providers' catalogs differ
    pub model_hint: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerationOptions {
    /// Defaults for freeform prose features (the roast)
    pub fn prose() -> Self {
        Self {
            model_hint: None,
            temperature: Some(0.7),
            max_tokens: Some(1024),
        }
    }

    /// Defaults for structured JSON features (alternatives sources)
    pub fn structured() -> Self {
        Self {
            model_hint: None,
            temperature: Some(0.7),
            max_tokens: Some(2048),
        }
    }

    pub fn temperature_or_default(&self) -> f32 {
        self.temperature.unwrap_or(0.7)
    }

    pub fn max_tokens_or_default(&self) -> u32 {
        self.max_tokens.unwrap_or(1024)
    }
}

/// Which provider actually produced a result
///
/// Informational only (logging and display), never business logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderUsed {
    Primary,
    Secondary,
}

impl std::fmt::Display for ProviderUsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "gemini"),
            Self::Secondary => write!(f, "openai"),
        }
    }
}

/// Output of a successful gateway call
#[derive(Debug, Clone)]
pub struct ProviderResult {
    pub text: String,
    pub provider_used: ProviderUsed,
}

/// A generated roast, computed once per call and immutable after
#[derive(Debug, Clone, Serialize)]
pub struct RoastResult {
    pub roast_text: String,
    /// Heuristic spiciness score, always in [0, 100]
    pub burn_score: u8,
    pub persona_name: String,
    pub persona_key: String,
}

/// Origin of a recommendation within the alternatives pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Missing,
    Budget,
    Replacement,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Budget => "budget",
            Self::Replacement => "replacement",
        }
    }
}

/// Severity bucket used as the primary sort key for recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Sort rank: high sorts before medium sorts before low
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

/// Savings figures as reported by the model (free text like "$45/month")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSavings {
    pub money: String,
    #[serde(default)]
    pub time: Option<String>,
}

/// One merged recommendation, ephemeral for a single request cycle
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub category: String,
    pub current_tool: Option<String>,
    pub suggested_tool: String,
    pub reason: String,
    pub estimated_cost: String,
    pub savings: Option<RecommendationSavings>,
    pub severity: Option<Severity>,
    /// Lower is better; tie-breaker after the severity bucket
    pub priority: i32,
    /// Filled in when the suggested name resolves against the catalog
    pub affiliate_url: Option<String>,
    pub tradeoffs: Vec<String>,
    /// Relevance score in [0, 100]
    pub context_score: Option<u8>,
}

// ---------------------------------------------------------------------------
// Raw response shapes, one per AI source. Deserialized leniently: unknown
// fields ignored, optional fields defaulted, so minor model drift does not
// break parsing.
// ---------------------------------------------------------------------------

/// One entry of the replacement-suggestions response
#[derive(Debug, Clone, Deserialize)]
pub struct RawReplacement {
    pub current_tool: String,
    pub suggested_tool: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub estimated_cost: String,
    /// Free text like "$45.00/month"; numbers are regex-extracted
    #[serde(default)]
    pub monthly_savings: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub priority: Option<i32>,
}

/// One entry of the missing-tools response
#[derive(Debug, Clone, Deserialize)]
pub struct RawMissingTool {
    pub suggested_tool: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub estimated_cost: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub priority: Option<i32>,
}

/// One entry of the budget-alternatives response
#[derive(Debug, Clone, Deserialize)]
pub struct RawBudgetAlternative {
    pub current_tool: String,
    pub suggested_tool: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub current_cost: String,
    #[serde(default)]
    pub alternative_cost: String,
    #[serde(default)]
    pub monthly_savings: String,
    #[serde(default)]
    pub tradeoffs: Vec<String>,
}

/// Envelope of the budget-alternatives response
#[derive(Debug, Clone, Deserialize)]
pub struct RawBudgetResponse {
    #[serde(default)]
    pub alternatives: Vec<RawBudgetAlternative>,
    #[serde(default)]
    pub total_monthly_savings: String,
    /// The model may only set this when every tool is already free
    #[serde(default)]
    pub no_alternatives_needed: bool,
}
