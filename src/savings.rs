//! Savings calculation for tool substitutions
//!
//! Pure, deterministic transformation from a list of tool changes to a
//! monetary/time/migration breakdown. No I/O, no AI calls. Sparse per-tool
//! metadata is backfilled from category-keyed heuristic tables so the
//! calculator always produces a number.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Heuristic defaults and migration effort for one tool category
pub struct CategoryProfile {
    pub category: &'static str,
    /// One-time setup effort in hours
    pub setup_hours: f64,
    /// Ongoing maintenance in hours per month
    pub maintenance_hours: f64,
    /// Complexity score, 1-10
    pub complexity: f64,
    /// Estimated migration effort in hours
    pub migration_hours: f64,
    pub migration_steps: &'static [&'static str],
}

const GENERIC_PROFILE: CategoryProfile = CategoryProfile {
    category: "general",
    setup_hours: 2.0,
    maintenance_hours: 1.0,
    complexity: 4.0,
    migration_hours: 2.0,
    migration_steps: &[
        "Export existing configuration and data",
        "Set up and configure the replacement",
        "Update references and cut over",
    ],
};

/// Migration effort table keyed by tool category
pub const CATEGORY_PROFILES: &[CategoryProfile] = &[
    CategoryProfile {
        category: "database",
        setup_hours: 4.0,
        maintenance_hours: 2.0,
        complexity: 7.0,
        migration_hours: 6.0,
        migration_steps: &[
            "Audit current schema and data volumes",
            "Provision the replacement database",
            "Write and test the migration script",
            "Run a dual-write or shadow period",
            "Cut over reads to the new database",
            "Decommission the old instance",
        ],
    },
    CategoryProfile {
        category: "auth",
        setup_hours: 3.0,
        maintenance_hours: 1.0,
        complexity: 6.0,
        migration_hours: 4.0,
        migration_steps: &[
            "Export user accounts and identities",
            "Configure the new identity provider",
            "Map session and token formats",
            "Migrate users in batches",
            "Retire the old login flow",
        ],
    },
    CategoryProfile {
        category: "payments",
        setup_hours: 4.0,
        maintenance_hours: 1.5,
        complexity: 7.0,
        migration_hours: 5.0,
        migration_steps: &[
            "Recreate products and pricing",
            "Integrate the new checkout flow",
            "Migrate stored payment methods where possible",
            "Run both processors during transition",
            "Reconcile the first settlement cycle",
        ],
    },
    CategoryProfile {
        category: "hosting",
        setup_hours: 2.0,
        maintenance_hours: 1.0,
        complexity: 5.0,
        migration_hours: 3.0,
        migration_steps: &[
            "Recreate build and deploy pipeline",
            "Provision environments and secrets",
            "Switch DNS with a low TTL",
            "Tear down the old deployment",
        ],
    },
    CategoryProfile {
        category: "analytics",
        setup_hours: 1.0,
        maintenance_hours: 0.5,
        complexity: 3.0,
        migration_hours: 1.0,
        migration_steps: &[
            "Add the new tracking snippet",
            "Recreate key dashboards and funnels",
            "Run both trackers in parallel briefly",
            "Remove the old snippet",
        ],
    },
    CategoryProfile {
        category: "email",
        setup_hours: 1.0,
        maintenance_hours: 0.5,
        complexity: 3.0,
        migration_hours: 2.0,
        migration_steps: &[
            "Verify sending domain on the new provider",
            "Port templates and API calls",
            "Warm up and monitor deliverability",
        ],
    },
    CategoryProfile {
        category: "monitoring",
        setup_hours: 2.0,
        maintenance_hours: 1.0,
        complexity: 4.0,
        migration_hours: 2.0,
        migration_steps: &[
            "Install the new SDK or agent",
            "Recreate alert rules and dashboards",
            "Remove the old instrumentation",
        ],
    },
    CategoryProfile {
        category: "design",
        setup_hours: 1.0,
        maintenance_hours: 0.5,
        complexity: 2.0,
        migration_hours: 1.0,
        migration_steps: &[
            "Import existing design files",
            "Re-share libraries with the team",
        ],
    },
];

/// Look up the profile for a category, falling back to the generic estimate
pub fn profile_for(category: &str) -> &'static CategoryProfile {
    let category = category.to_lowercase();
    CATEGORY_PROFILES
        .iter()
        .find(|p| p.category == category)
        .unwrap_or(&GENERIC_PROFILE)
}

/// Cost facts about one side of a substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCost {
    pub name: String,
    /// Monthly price in dollars
    #[serde(default)]
    pub price: f64,
    /// One-time setup hours; backfilled from the category profile if absent
    #[serde(default)]
    pub setup_time: Option<f64>,
    /// Monthly maintenance hours; backfilled if absent
    #[serde(default)]
    pub maintenance_time: Option<f64>,
    /// Complexity score 1-10; backfilled if absent
    #[serde(default)]
    pub complexity_score: Option<f64>,
    #[serde(default)]
    pub affiliate_url: Option<String>,
}

impl ToolCost {
    pub fn new(name: &str, price: f64) -> Self {
        Self {
            name: name.to_string(),
            price,
            setup_time: None,
            maintenance_time: None,
            complexity_score: None,
            affiliate_url: None,
        }
    }
}

/// One accepted substitution; never mutated by the calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolChange {
    pub from: ToolCost,
    pub to: ToolCost,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonetarySavings {
    pub monthly: f64,
    pub annual: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeSavings {
    /// Hours per month, never negative
    pub monthly: f64,
    pub annual: f64,
}

/// Overall migration difficulty label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationComplexity {
    Easy,
    Moderate,
    Hard,
}

impl std::fmt::Display for MigrationComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Moderate => write!(f, "moderate"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationEstimate {
    /// Total migration effort in hours
    pub time_required: f64,
    pub complexity: MigrationComplexity,
    pub steps: Vec<String>,
}

/// The full savings breakdown for a set of substitutions
#[derive(Debug, Clone, Serialize)]
pub struct SavingsBreakdown {
    pub monetary: MonetarySavings,
    pub time: TimeSavings,
    pub migration: MigrationEstimate,
    pub changes: Vec<ToolChange>,
}

impl SavingsBreakdown {
    /// Months of time savings needed to recoup the migration effort
    ///
    /// Infinity when there are no time savings: the switch never breaks
    /// even on time alone. Callers must handle that case in display.
    pub fn break_even_months(&self) -> f64 {
        if self.time.monthly <= 0.0 {
            f64::INFINITY
        } else {
            self.migration.time_required / self.time.monthly
        }
    }

    /// First-year value in dollars at a given hourly rate
    pub fn annual_value_at_rate(&self, hourly_rate: f64) -> f64 {
        self.monetary.annual + self.time.annual * hourly_rate
            - self.migration.time_required * hourly_rate
    }
}

fn complexity_label(total_hours: f64) -> MigrationComplexity {
    if total_hours <= 3.0 {
        MigrationComplexity::Easy
    } else if total_hours <= 8.0 {
        MigrationComplexity::Moderate
    } else {
        MigrationComplexity::Hard
    }
}

/// Compute the savings breakdown for a list of substitutions
///
/// Monetary savings are the exact sum of price deltas. Time savings per
/// change amortize setup over a year, count maintenance monthly, and value
/// complexity reduction at half an hour per point; each change is floored
/// at zero because a negative "savings" figure reads as a bug to users.
pub fn calculate_savings(changes: Vec<ToolChange>) -> Result<SavingsBreakdown> {
    let mut monthly_money = 0.0;
    let mut monthly_time = 0.0;
    let mut migration_hours = 0.0;
    let mut steps = Vec::new();

    for change in &changes {
        if change.from.name.eq_ignore_ascii_case(&change.to.name) {
            bail!(
                "Change from '{}' to '{}' is not a substitution",
                change.from.name,
                change.to.name
            );
        }

        let profile = profile_for(&change.category);

        monthly_money += change.from.price - change.to.price;

        let from_setup = change.from.setup_time.unwrap_or(profile.setup_hours);
        let to_setup = change.to.setup_time.unwrap_or(profile.setup_hours);
        let from_maint = change
            .from
            .maintenance_time
            .unwrap_or(profile.maintenance_hours);
        let to_maint = change.to.maintenance_time.unwrap_or(profile.maintenance_hours);
        let from_cx = change.from.complexity_score.unwrap_or(profile.complexity);
        let to_cx = change.to.complexity_score.unwrap_or(profile.complexity);

        let change_time =
            (from_setup - to_setup) / 12.0 + (from_maint - to_maint) + (from_cx - to_cx) * 0.5;
        monthly_time += change_time.max(0.0);

        migration_hours += profile.migration_hours;
        for step in profile.migration_steps {
            let step = (*step).to_string();
            if !steps.contains(&step) {
                steps.push(step);
            }
        }
    }

    Ok(SavingsBreakdown {
        monetary: MonetarySavings {
            monthly: monthly_money,
            annual: monthly_money * 12.0,
        },
        time: TimeSavings {
            monthly: monthly_time,
            annual: monthly_time * 12.0,
        },
        migration: MigrationEstimate {
            time_required: migration_hours,
            complexity: complexity_label(migration_hours),
            steps,
        },
        changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database_change() -> ToolChange {
        ToolChange {
            from: ToolCost {
                name: "MongoDB Atlas".into(),
                price: 29.0,
                setup_time: Some(4.0),
                maintenance_time: Some(2.0),
                complexity_score: Some(7.0),
                affiliate_url: None,
            },
            to: ToolCost {
                name: "Supabase".into(),
                price: 0.0,
                setup_time: Some(1.0),
                maintenance_time: Some(0.5),
                complexity_score: Some(2.0),
                affiliate_url: None,
            },
            reasoning: "x".into(),
            category: "database".into(),
        }
    }

    #[test]
    fn test_database_change_scenario() {
        let breakdown = calculate_savings(vec![database_change()]).unwrap();

        assert!((breakdown.monetary.monthly - 29.0).abs() < f64::EPSILON);
        assert!((breakdown.monetary.annual - 348.0).abs() < f64::EPSILON);
        // (4-1)/12 + (2-0.5) + (7-2)*0.5 = 0.25 + 1.5 + 2.5
        assert!((breakdown.time.monthly - 4.25).abs() < 1e-9);
        assert!((breakdown.migration.time_required - 6.0).abs() < f64::EPSILON);
        assert_eq!(breakdown.migration.complexity, MigrationComplexity::Moderate);
        assert_eq!(breakdown.migration.steps.len(), 6);
    }

    #[test]
    fn test_time_savings_never_negative() {
        // The "better" tool is worse on every time axis; raw arithmetic
        // would be negative, the floor holds it at zero
        let mut change = database_change();
        std::mem::swap(&mut change.from.setup_time, &mut change.to.setup_time);
        std::mem::swap(&mut change.from.maintenance_time, &mut change.to.maintenance_time);
        std::mem::swap(
            &mut change.from.complexity_score,
            &mut change.to.complexity_score,
        );

        let breakdown = calculate_savings(vec![change]).unwrap();
        assert!(breakdown.time.monthly >= 0.0);
        assert_eq!(breakdown.time.monthly, 0.0);
    }

    #[test]
    fn test_monetary_additivity() {
        let mut cheaper = database_change();
        cheaper.from.price = 10.0;
        cheaper.to.price = 25.0; // negative delta still counts exactly
        cheaper.to.name = "Neon".into();

        let breakdown = calculate_savings(vec![database_change(), cheaper]).unwrap();
        assert!((breakdown.monetary.monthly - (29.0 - 15.0)).abs() < f64::EPSILON);
        assert!((breakdown.monetary.annual - breakdown.monetary.monthly * 12.0).abs()
            < f64::EPSILON);
    }

    #[test]
    fn test_unknown_category_uses_generic_profile() {
        let mut change = database_change();
        change.category = "quantum-blockchain".into();

        let breakdown = calculate_savings(vec![change]).unwrap();
        assert!((breakdown.migration.time_required - 2.0).abs() < f64::EPSILON);
        assert_eq!(breakdown.migration.steps.len(), 3);
        assert_eq!(breakdown.migration.complexity, MigrationComplexity::Easy);
    }

    #[test]
    fn test_complexity_labels() {
        let easy = calculate_savings(vec![ToolChange {
            from: ToolCost::new("Mixpanel", 28.0),
            to: ToolCost::new("Plausible", 9.0),
            reasoning: String::new(),
            category: "analytics".into(),
        }])
        .unwrap();
        assert_eq!(easy.migration.complexity, MigrationComplexity::Easy);

        let mut second = database_change();
        second.from.name = "PlanetScale".into();
        let hard = calculate_savings(vec![database_change(), second]).unwrap();
        assert_eq!(hard.migration.complexity, MigrationComplexity::Hard);
    }

    #[test]
    fn test_backfill_from_category_profile() {
        // No per-tool metadata at all; category defaults keep the math alive
        let breakdown = calculate_savings(vec![ToolChange {
            from: ToolCost::new("SendGrid", 19.95),
            to: ToolCost::new("Postmark", 15.0),
            reasoning: String::new(),
            category: "email".into(),
        }])
        .unwrap();

        // Identical backfilled values on both sides: zero time savings
        assert_eq!(breakdown.time.monthly, 0.0);
        assert!((breakdown.monetary.monthly - 4.95).abs() < 1e-9);
        assert!(breakdown.break_even_months().is_infinite());
    }

    #[test]
    fn test_roi_math() {
        let breakdown = calculate_savings(vec![database_change()]).unwrap();

        // 6 migration hours / 4.25 hours saved per month
        assert!((breakdown.break_even_months() - 6.0 / 4.25).abs() < 1e-9);

        // 348 + 51*100 - 6*100
        let value = breakdown.annual_value_at_rate(100.0);
        assert!((value - (348.0 + 51.0 * 100.0 - 600.0)).abs() < 1e-9);
    }

    #[test]
    fn test_same_tool_rejected() {
        let mut change = database_change();
        change.to.name = "mongodb atlas".into();
        assert!(calculate_savings(vec![change]).is_err());
    }

    #[test]
    fn test_empty_changes() {
        let breakdown = calculate_savings(Vec::new()).unwrap();
        assert_eq!(breakdown.monetary.monthly, 0.0);
        assert_eq!(breakdown.migration.complexity, MigrationComplexity::Easy);
        assert!(breakdown.migration.steps.is_empty());
        assert!(breakdown.break_even_months().is_infinite());
    }

    #[test]
    fn test_camel_case_json_input() {
        let json = r#"[{
            "from": {"name": "MongoDB Atlas", "price": 29, "setupTime": 4,
                     "maintenanceTime": 2, "complexityScore": 7},
            "to": {"name": "Supabase", "price": 0, "setupTime": 1,
                   "maintenanceTime": 0.5, "complexityScore": 2},
            "reasoning": "relational fits better",
            "category": "database"
        }]"#;

        let changes: Vec<ToolChange> = serde_json::from_str(json).unwrap();
        let breakdown = calculate_savings(changes).unwrap();
        assert!((breakdown.time.monthly - 4.25).abs() < 1e-9);
    }
}
