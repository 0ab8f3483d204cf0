//! Core data models for the product catalog and AI pipeline inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation status of a catalog entry
///
/// Only approved tools participate in AI suggestion reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Pending,
    Approved,
    Rejected,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl From<&str> for ToolStatus {
    fn from(s: &str) -> Self {
        match s {
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tool in the product catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTool {
    pub id: Option<i64>,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub monthly_price: Option<f64>,
    pub website: Option<String>,
    pub affiliate_url: Option<String>,
    pub status: ToolStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogTool {
    /// Create a new pending catalog entry
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: name.to_string(),
            category: None,
            description: None,
            monthly_price: None,
            website: None,
            affiliate_url: None,
            status: ToolStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_monthly_price(mut self, price: f64) -> Self {
        self.monthly_price = Some(price);
        self
    }

    pub fn with_website(mut self, website: &str) -> Self {
        self.website = Some(website.to_string());
        self
    }

    pub fn with_affiliate_url(mut self, url: &str) -> Self {
        self.affiliate_url = Some(url.to_string());
        self
    }

    pub fn approved(mut self) -> Self {
        self.status = ToolStatus::Approved;
        self
    }
}

/// One tool of a stack, as fed to prompt builders
///
/// Constructed by commands from catalog rows (or from bare names when the
/// tool is not in the catalog).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRef {
    pub name: String,
    pub category: Option<String>,
    pub monthly_price: Option<f64>,
}

impl ToolRef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            category: None,
            monthly_price: None,
        }
    }

    /// Build a reference from a catalog row, keeping category and price
    pub fn from_catalog(tool: &CatalogTool) -> Self {
        Self {
            name: tool.name.clone(),
            category: tool.category.clone(),
            monthly_price: tool.monthly_price,
        }
    }

    /// Display label used in prompts: `"Name (Category)"`
    pub fn label(&self) -> String {
        match &self.category {
            Some(cat) => format!("{} ({})", self.name, cat),
            None => self.name.clone(),
        }
    }
}
