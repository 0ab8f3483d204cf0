//! Alternatives and recommendation generation
//!
//! Issues three independently-prompted AI calls (replacements, missing
//! tools, budget alternatives) concurrently, parses each leniently,
//! reconciles suggested names against the product catalog, and merges the
//! survivors into one ranked list with aggregate savings. Partial results
//! are expected and fine: a failing source contributes a warning, never an
//! abort.

use std::thread;

use anyhow::Result;
use serde::Serialize;

use crate::ai::builders::{BudgetContext, budget_prompt, missing_tools_prompt, replacement_prompt};
use crate::ai::gateway::ProviderGateway;
use crate::ai::parsers::{
    extract_money, parse_budget_response, parse_missing_response, parse_replacement_response,
};
use crate::ai::types::{
    GenerationOptions, RawBudgetResponse, RawMissingTool, RawReplacement, Recommendation,
    RecommendationKind, RecommendationSavings, Severity,
};
use crate::models::{CatalogTool, ToolRef};

/// Read-only "resolve tool by name" port
///
/// Case-insensitive substring match against approved entries, first match
/// wins, zero or one result. A best-effort fuzzy join by contract; do not
/// tighten it to exact match.
pub trait CatalogLookup {
    fn find_approved(&self, name: &str) -> Result<Option<CatalogTool>>;
}

impl CatalogLookup for crate::db::Database {
    fn find_approved(&self, name: &str) -> Result<Option<CatalogTool>> {
        self.find_approved_by_name(name)
    }
}

/// Outcome of one alternatives run
#[derive(Debug, Serialize)]
pub struct AlternativesReport {
    /// Ranked, deduplicated recommendations; possibly empty, never an error
    pub recommendations: Vec<Recommendation>,
    pub total_monthly_savings: f64,
    pub total_annual_savings: f64,
    /// Per-source failures, swallowed at the point of occurrence
    pub source_errors: Vec<String>,
}

/// Per-category display grouping
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub category: String,
    /// Highest context score in the category
    pub primary: &'a Recommendation,
    /// First remaining pick with a concrete money figure
    pub budget_pick: Option<&'a Recommendation>,
    pub more: Vec<&'a Recommendation>,
}

fn severity_rank(severity: Option<Severity>) -> u8 {
    severity.map_or(Severity::Medium.rank(), |s| s.rank())
}

fn context_score(severity: Option<Severity>, catalog_matched: bool) -> u8 {
    let base: u8 = match severity {
        Some(Severity::High) => 85,
        Some(Severity::Medium) | None => 70,
        Some(Severity::Low) => 55,
    };
    let bonus = if catalog_matched { 10 } else { 0 };
    (base + bonus).min(100)
}

/// The three-source recommendation generator
pub struct AlternativesGenerator<'a> {
    gateway: &'a ProviderGateway,
    catalog: &'a dyn CatalogLookup,
}

impl<'a> AlternativesGenerator<'a> {
    pub fn new(gateway: &'a ProviderGateway, catalog: &'a dyn CatalogLookup) -> Self {
        Self { gateway, catalog }
    }

    /// Run the full pipeline
    ///
    /// Never fails as a whole; each AI source and each catalog lookup fails
    /// independently into `source_errors`. Re-running on identical input is
    /// not guaranteed to produce identical output; the sources are
    /// non-deterministic by nature.
    pub fn generate(
        &self,
        stack_name: &str,
        tools: &[ToolRef],
        monthly_cost: Option<f64>,
        context: Option<&BudgetContext>,
    ) -> AlternativesReport {
        let replacement = replacement_prompt(stack_name, tools);
        let missing = missing_tools_prompt(stack_name, tools);
        let budget = budget_prompt(stack_name, tools, monthly_cost, context);

        let mut source_errors = Vec::new();

        // The only deliberate I/O overlap in the pipeline: all three
        // sources in flight at once against the shared gateway. The catalog
        // stays on this thread; reconciliation happens after the joins.
        let gateway = self.gateway;
        let (replacements, missing_tools, budget_response) = thread::scope(|scope| {
            let rep =
                scope.spawn(move || call_source(gateway, &replacement, parse_replacement_response));
            let mis = scope.spawn(move || call_source(gateway, &missing, parse_missing_response));
            let bud = scope.spawn(move || call_source(gateway, &budget, parse_budget_response));

            (
                join_source(rep, "replacements", &mut source_errors),
                join_source(mis, "missing tools", &mut source_errors),
                join_source(bud, "budget alternatives", &mut source_errors),
            )
        });

        let mut recommendations = Vec::new();
        let mut total_monthly = 0.0;

        if let Some(raws) = replacements {
            total_monthly += self.merge_replacements(raws, &mut recommendations, &mut source_errors);
        }
        if let Some(raws) = missing_tools {
            self.merge_missing(raws, &mut recommendations, &mut source_errors);
        }
        if let Some(response) = budget_response {
            total_monthly += self.merge_budget(response, &mut recommendations, &mut source_errors);
        }

        dedup(&mut recommendations);
        rank(&mut recommendations);

        AlternativesReport {
            recommendations,
            total_monthly_savings: total_monthly,
            total_annual_savings: total_monthly * 12.0,
            source_errors,
        }
    }

    /// Merge replacement suggestions; returns their summed monthly savings
    fn merge_replacements(
        &self,
        raws: Vec<RawReplacement>,
        out: &mut Vec<Recommendation>,
        errors: &mut Vec<String>,
    ) -> f64 {
        let mut total = 0.0;

        for raw in raws {
            let savings = extract_money(&raw.monthly_savings).unwrap_or(0.0);
            // Replacements must pay for themselves to be worth showing
            if savings <= 0.0 {
                continue;
            }
            total += savings;

            let rec = Recommendation {
                kind: RecommendationKind::Replacement,
                category: raw.category.unwrap_or_else(|| "general".to_string()),
                current_tool: Some(raw.current_tool),
                suggested_tool: raw.suggested_tool,
                reason: raw.reason,
                estimated_cost: raw.estimated_cost,
                savings: Some(RecommendationSavings {
                    money: raw.monthly_savings,
                    time: None,
                }),
                severity: raw.severity.or(Some(Severity::Medium)),
                priority: raw.priority.unwrap_or(5),
                affiliate_url: None,
                tradeoffs: Vec::new(),
                context_score: None,
            };
            out.push(self.reconcile(rec, errors));
        }

        total
    }

    /// Merge missing-tool suggestions; retained regardless of savings
    fn merge_missing(
        &self,
        raws: Vec<RawMissingTool>,
        out: &mut Vec<Recommendation>,
        errors: &mut Vec<String>,
    ) {
        for raw in raws {
            let rec = Recommendation {
                kind: RecommendationKind::Missing,
                category: raw.category.unwrap_or_else(|| "general".to_string()),
                current_tool: None,
                suggested_tool: raw.suggested_tool,
                reason: raw.reason,
                estimated_cost: raw.estimated_cost,
                savings: None,
                severity: raw.severity.or(Some(Severity::Medium)),
                priority: raw.priority.unwrap_or(5),
                affiliate_url: None,
                tradeoffs: Vec::new(),
                context_score: None,
            };
            out.push(self.reconcile(rec, errors));
        }
    }

    /// Merge budget alternatives; returns the source's total monthly savings
    fn merge_budget(
        &self,
        response: RawBudgetResponse,
        out: &mut Vec<Recommendation>,
        errors: &mut Vec<String>,
    ) -> f64 {
        let mut summed = 0.0;

        for raw in response.alternatives {
            let savings = extract_money(&raw.monthly_savings).unwrap_or(0.0);
            if savings <= 0.0 {
                continue;
            }
            summed += savings;

            let rec = Recommendation {
                kind: RecommendationKind::Budget,
                category: raw.category.unwrap_or_else(|| "general".to_string()),
                current_tool: Some(raw.current_tool),
                suggested_tool: raw.suggested_tool,
                reason: raw.reason,
                estimated_cost: raw.alternative_cost,
                savings: Some(RecommendationSavings {
                    money: raw.monthly_savings,
                    time: None,
                }),
                severity: Some(Severity::Low),
                priority: 5,
                affiliate_url: None,
                tradeoffs: raw.tradeoffs,
                context_score: None,
            };
            out.push(self.reconcile(rec, errors));
        }

        // Prefer the structured total; fall back to the per-entry sum
        extract_money(&response.total_monthly_savings)
            .filter(|total| *total > 0.0)
            .unwrap_or(summed)
    }

    /// Resolve a suggested name against the catalog and score the result
    ///
    /// A failed lookup is logged and swallowed; the recommendation survives
    /// with the model's free-text name.
    fn reconcile(&self, mut rec: Recommendation, errors: &mut Vec<String>) -> Recommendation {
        let mut matched = false;

        match self.catalog.find_approved(&rec.suggested_tool) {
            Ok(Some(tool)) => {
                matched = true;
                rec.suggested_tool = tool.name;
                rec.affiliate_url = tool.affiliate_url;
                if rec.category == "general"
                    && let Some(category) = tool.category
                {
                    rec.category = category;
                }
            }
            Ok(None) => {}
            Err(e) => errors.push(format!(
                "catalog lookup for '{}' failed: {e:#}",
                rec.suggested_tool
            )),
        }

        rec.context_score = Some(context_score(rec.severity, matched));
        rec
    }
}

/// One gateway call plus parse, isolated per source
fn call_source<T>(
    gateway: &ProviderGateway,
    prompt: &str,
    parse: impl Fn(&str) -> Result<T>,
) -> Result<T> {
    let result = gateway.generate(prompt, &GenerationOptions::structured())?;
    parse(&result.text)
}

fn join_source<T>(
    handle: thread::ScopedJoinHandle<'_, Result<T>>,
    label: &str,
    errors: &mut Vec<String>,
) -> Option<T> {
    match handle.join() {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            errors.push(format!("{label}: {e:#}"));
            None
        }
        Err(_) => {
            errors.push(format!("{label}: worker panicked"));
            None
        }
    }
}

/// Drop later duplicates of the same suggested tool within a category
fn dedup(recommendations: &mut Vec<Recommendation>) {
    let mut seen: Vec<(String, String)> = Vec::new();
    recommendations.retain(|rec| {
        let key = (
            rec.category.to_lowercase(),
            rec.suggested_tool.to_lowercase(),
        );
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
}

/// Severity bucket first, then numeric priority (lower = better)
///
/// Final order is determined here alone, never by call-completion order.
fn rank(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| {
        severity_rank(a.severity)
            .cmp(&severity_rank(b.severity))
            .then(a.priority.cmp(&b.priority))
    });
}

/// Group ranked recommendations by category for rendering
///
/// Each category surfaces one primary pick (highest context score) and one
/// budget pick (first remaining entry with a money figure); the rest are
/// collapsed into `more`.
pub fn group_by_category(recommendations: &[Recommendation]) -> Vec<CategoryGroup<'_>> {
    let mut categories: Vec<String> = Vec::new();
    for rec in recommendations {
        if !categories.contains(&rec.category) {
            categories.push(rec.category.clone());
        }
    }

    categories
        .into_iter()
        .filter_map(|category| {
            let members: Vec<&Recommendation> = recommendations
                .iter()
                .filter(|r| r.category == category)
                .collect();

            let primary = *members
                .iter()
                .max_by_key(|r| r.context_score.unwrap_or(0))?;

            let budget_pick = members
                .iter()
                .find(|r| {
                    !std::ptr::eq(**r, primary)
                        && r.savings.as_ref().is_some_and(|s| !s.money.is_empty())
                })
                .copied();

            let more = members
                .iter()
                .filter(|r| {
                    !std::ptr::eq(**r, primary)
                        && budget_pick.is_none_or(|b| !std::ptr::eq(**r, b))
                })
                .copied()
                .collect();

            Some(CategoryGroup {
                category,
                primary,
                budget_pick,
                more,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gateway::{ProviderGateway, TextProvider};
    use anyhow::bail;

    /// Routes canned responses by markers in the three distinct prompts
    struct RoutingProvider {
        replacement: Result<String, String>,
        missing: Result<String, String>,
        budget: Result<String, String>,
    }

    impl RoutingProvider {
        fn pick(&self, prompt: &str) -> &Result<String, String> {
            if prompt.contains("better replacement exists") {
                &self.replacement
            } else if prompt.contains("MISSING") {
                &self.missing
            } else {
                &self.budget
            }
        }
    }

    impl TextProvider for RoutingProvider {
        fn generate(&self, prompt: &str, _options: &GenerationOptions) -> Result<String> {
            match self.pick(prompt) {
                Ok(text) => Ok(text.clone()),
                Err(msg) => bail!("{}", msg.clone()),
            }
        }
    }

    struct EmptyCatalog;

    impl CatalogLookup for EmptyCatalog {
        fn find_approved(&self, _name: &str) -> Result<Option<CatalogTool>> {
            Ok(None)
        }
    }

    struct OneToolCatalog;

    impl CatalogLookup for OneToolCatalog {
        fn find_approved(&self, name: &str) -> Result<Option<CatalogTool>> {
            if name.to_lowercase().contains("sentry") {
                Ok(Some(
                    CatalogTool::new("Sentry")
                        .with_category("monitoring")
                        .with_affiliate_url("https://sentry.io/?ref=stackroast")
                        .approved(),
                ))
            } else {
                Ok(None)
            }
        }
    }

    fn tools() -> Vec<ToolRef> {
        vec![ToolRef::new("MongoDB"), ToolRef::new("Mixpanel")]
    }

    const MISSING_OK: &str = r#"[{"suggested_tool": "sentry", "category": "monitoring",
        "reason": "No error tracking", "estimated_cost": "$26/month",
        "severity": "high", "priority": 1}]"#;

    const BUDGET_OK: &str = r#"{"alternatives": [{"current_tool": "Mixpanel",
        "suggested_tool": "Plausible", "category": "analytics",
        "reason": "Cheaper", "current_cost": "$28.00", "alternative_cost": "$9.00",
        "monthly_savings": "$10.00", "tradeoffs": ["No cohorts"]}],
        "total_monthly_savings": "$10.00", "no_alternatives_needed": false}"#;

    #[test]
    fn test_partial_failure_tolerance() {
        // Replacement source throws; the other two still land (scenario 5)
        let provider = RoutingProvider {
            replacement: Err("rate limit".into()),
            missing: Ok(MISSING_OK.into()),
            budget: Ok(BUDGET_OK.into()),
        };
        let gateway = ProviderGateway::with_providers(Some(Box::new(provider)), None);
        let catalog = OneToolCatalog;
        let generator = AlternativesGenerator::new(&gateway, &catalog);

        let report = generator.generate("My Stack", &tools(), Some(85.0), None);

        assert_eq!(report.recommendations.len(), 2);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.kind == RecommendationKind::Missing));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.kind == RecommendationKind::Budget));
        assert_eq!(report.source_errors.len(), 1);
        assert!((report.total_monthly_savings - 10.0).abs() < f64::EPSILON);
        assert!((report.total_annual_savings - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_all_sources_failing_yields_empty_report() {
        let provider = RoutingProvider {
            replacement: Err("down".into()),
            missing: Err("down".into()),
            budget: Err("down".into()),
        };
        let gateway = ProviderGateway::with_providers(Some(Box::new(provider)), None);
        let catalog = EmptyCatalog;
        let generator = AlternativesGenerator::new(&gateway, &catalog);

        let report = generator.generate("My Stack", &tools(), None, None);
        assert!(report.recommendations.is_empty());
        assert_eq!(report.source_errors.len(), 3);
    }

    #[test]
    fn test_savings_filter() {
        // Zero-savings replacement dropped, positive one kept, missing exempt
        let replacements = r#"[
            {"current_tool": "MongoDB", "suggested_tool": "Supabase",
             "category": "database", "reason": "x", "estimated_cost": "$25/month",
             "monthly_savings": "$0.00", "severity": "high", "priority": 1},
            {"current_tool": "Mixpanel", "suggested_tool": "PostHog",
             "category": "analytics", "reason": "x", "estimated_cost": "Free",
             "monthly_savings": "$28.00", "severity": "medium", "priority": 2}
        ]"#;
        let provider = RoutingProvider {
            replacement: Ok(replacements.into()),
            missing: Ok(MISSING_OK.into()),
            budget: Ok(r#"{"alternatives": [], "total_monthly_savings": "$0.00"}"#.into()),
        };
        let gateway = ProviderGateway::with_providers(Some(Box::new(provider)), None);
        let catalog = EmptyCatalog;
        let generator = AlternativesGenerator::new(&gateway, &catalog);

        let report = generator.generate("My Stack", &tools(), None, None);

        assert_eq!(report.recommendations.len(), 2);
        assert!(!report
            .recommendations
            .iter()
            .any(|r| r.suggested_tool == "Supabase"));
        assert!((report.total_monthly_savings - 28.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_catalog_reconciliation_canonicalizes() {
        let provider = RoutingProvider {
            replacement: Err("off".into()),
            missing: Ok(MISSING_OK.into()),
            budget: Err("off".into()),
        };
        let gateway = ProviderGateway::with_providers(Some(Box::new(provider)), None);
        let catalog = OneToolCatalog;
        let generator = AlternativesGenerator::new(&gateway, &catalog);

        let report = generator.generate("My Stack", &tools(), None, None);
        let rec = &report.recommendations[0];

        // "sentry" resolved to the canonical catalog entry
        assert_eq!(rec.suggested_tool, "Sentry");
        assert_eq!(
            rec.affiliate_url.as_deref(),
            Some("https://sentry.io/?ref=stackroast")
        );
        // High severity + catalog match: 85 + 10
        assert_eq!(rec.context_score, Some(95));
    }

    #[test]
    fn test_ranking_severity_then_priority() {
        let mut recs = vec![
            sample_rec("b-low", Some(Severity::Low), 1),
            sample_rec("a-high-2", Some(Severity::High), 2),
            sample_rec("a-high-1", Some(Severity::High), 1),
            sample_rec("c-medium", None, 1),
        ];
        rank(&mut recs);

        let order: Vec<&str> = recs.iter().map(|r| r.suggested_tool.as_str()).collect();
        assert_eq!(order, vec!["a-high-1", "a-high-2", "c-medium", "b-low"]);
    }

    #[test]
    fn test_dedup_same_tool_and_category() {
        let mut recs = vec![
            sample_rec("PostHog", Some(Severity::High), 1),
            sample_rec("posthog", Some(Severity::Low), 9),
        ];
        dedup(&mut recs);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].suggested_tool, "PostHog");
    }

    #[test]
    fn test_group_by_category_picks() {
        let mut high = sample_rec("Primary", Some(Severity::High), 1);
        high.context_score = Some(95);
        let mut cheap = sample_rec("Cheap", Some(Severity::Low), 2);
        cheap.context_score = Some(55);
        cheap.savings = Some(RecommendationSavings {
            money: "$12.00".into(),
            time: None,
        });
        let mut extra = sample_rec("Extra", Some(Severity::Low), 3);
        extra.context_score = Some(50);

        let recs = vec![high, cheap, extra];
        let groups = group_by_category(&recs);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].primary.suggested_tool, "Primary");
        assert_eq!(groups[0].budget_pick.unwrap().suggested_tool, "Cheap");
        assert_eq!(groups[0].more.len(), 1);
    }

    fn sample_rec(name: &str, severity: Option<Severity>, priority: i32) -> Recommendation {
        Recommendation {
            kind: RecommendationKind::Replacement,
            category: "general".into(),
            current_tool: Some("Old".into()),
            suggested_tool: name.into(),
            reason: "test".into(),
            estimated_cost: "$1".into(),
            savings: None,
            severity,
            priority,
            affiliate_url: None,
            tradeoffs: Vec::new(),
            context_score: None,
        }
    }
}
