//! AI pipeline: provider gateway, prompt builders, parsers and personas
//!
//! The gateway wraps two LLM backends (Gemini primary, an OpenAI-compatible
//! endpoint secondary) behind one call with automatic failover. Builders are
//! pure prompt constructors; parsers normalize whatever the models send
//! back. Everything here is request-scoped: no state survives a call beyond
//! the injected provider configuration.

pub mod builders;
pub mod gateway;
pub mod parsers;
pub mod personas;
pub mod prompts;
pub mod stream;
pub mod types;


pub use builders::BudgetContext;
pub use gateway::{GatewayError, ProviderConfig, ProviderGateway, TextProvider};
pub use types::{
    GenerationOptions, ProviderResult, ProviderUsed, Recommendation, RecommendationKind,
    RecommendationSavings, RoastResult, Severity,
};
