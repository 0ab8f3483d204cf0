//! The alternatives command

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use dialoguer::{MultiSelect, theme::ColorfulTheme};

use crate::ai::builders::BudgetContext;
use crate::ai::gateway::{ProviderConfig, ProviderGateway};
use crate::ai::parsers::extract_money;
use crate::ai::types::{Recommendation, RecommendationKind, Severity};
use crate::alternatives::{AlternativesGenerator, AlternativesReport, group_by_category};
use crate::config::StackRoastConfig;
use crate::db::Database;
use crate::savings::{ToolChange, ToolCost, calculate_savings};

use super::{known_monthly_cost, resolve_tools, spinner};

#[allow(clippy::too_many_arguments)]
pub fn cmd_alternatives(
    db: &Database,
    config: &StackRoastConfig,
    stack_name: &str,
    tool_args: &[String],
    monthly_cost: Option<f64>,
    users: Option<u32>,
    budget: Option<String>,
    use_case: Option<String>,
    hourly_rate: f64,
    interactive: bool,
    json_output: bool,
) -> Result<()> {
    let tools = resolve_tools(db, tool_args)?;
    let monthly_cost = monthly_cost.or_else(|| known_monthly_cost(&tools));

    let context = (users.is_some() || budget.is_some() || use_case.is_some()).then(|| {
        let defaults = BudgetContext::default();
        BudgetContext {
            expected_users: users.unwrap_or(defaults.expected_users),
            budget: budget.unwrap_or(defaults.budget),
            use_case: use_case.unwrap_or(defaults.use_case),
        }
    });

    let gateway = ProviderGateway::new(&ProviderConfig::from(&config.ai));
    let generator = AlternativesGenerator::new(&gateway, db);

    let sp = (!json_output).then(|| spinner("Asking the models what they would do instead..."));
    let report = generator.generate(stack_name, &tools, monthly_cost, context.as_ref());
    if let Some(sp) = sp {
        sp.finish_and_clear();
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    display_report(stack_name, &report);

    if interactive && !report.recommendations.is_empty() {
        run_interactive(db, &report, hourly_rate)?;
    }

    Ok(())
}

fn display_report(stack_name: &str, report: &AlternativesReport) {
    println!("{} Recommendations for '{}'", ">".cyan(), stack_name.bold());
    println!();

    for error in &report.source_errors {
        println!("{} {}", "!".yellow(), error.dimmed());
    }
    if !report.source_errors.is_empty() {
        println!();
    }

    if report.recommendations.is_empty() {
        println!("{} No recommendations; your stack survived this round", "+".green());
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec![
        "Kind", "Category", "Current", "Suggested", "Severity", "Cost", "Savings",
    ]);

    for rec in &report.recommendations {
        table.add_row(vec![
            rec.kind.as_str().to_string(),
            rec.category.clone(),
            rec.current_tool.clone().unwrap_or_else(|| "-".to_string()),
            rec.suggested_tool.clone(),
            severity_label(rec.severity),
            if rec.estimated_cost.is_empty() {
                "-".to_string()
            } else {
                rec.estimated_cost.clone()
            },
            rec.savings
                .as_ref()
                .map(|s| s.money.clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{table}");
    println!();

    // Per-category picks
    for group in group_by_category(&report.recommendations) {
        println!("{}", group.category.bold());
        print_pick("Top pick", group.primary);
        if let Some(budget) = group.budget_pick {
            print_pick("Budget pick", budget);
        }
        if !group.more.is_empty() {
            println!(
                "  {} {} more in this category",
                ">".dimmed(),
                group.more.len()
            );
        }
        println!();
    }

    if report.total_monthly_savings > 0.0 {
        println!(
            "{} Estimated savings: {} /month ({} /year)",
            ">".cyan(),
            format!("${:.2}", report.total_monthly_savings).green().bold(),
            format!("${:.2}", report.total_annual_savings).green()
        );
    }
}

fn print_pick(label: &str, rec: &Recommendation) {
    let switch = match &rec.current_tool {
        Some(current) => format!("{} → {}", current, rec.suggested_tool.cyan()),
        None => format!("add {}", rec.suggested_tool.cyan()),
    };
    println!("  {} {}: {}", ">".cyan(), label.bold(), switch);
    if !rec.reason.is_empty() {
        println!("    {}", rec.reason.dimmed());
    }
    for tradeoff in &rec.tradeoffs {
        println!("    {} {}", "!".yellow(), tradeoff.dimmed());
    }
    if let Some(url) = &rec.affiliate_url {
        println!("    {}", url.dimmed());
    }
}

fn severity_label(severity: Option<Severity>) -> String {
    match severity {
        Some(Severity::High) => "high".red().to_string(),
        Some(Severity::Medium) | None => "medium".yellow().to_string(),
        Some(Severity::Low) => "low".to_string(),
    }
}

/// Let the user pick substitutions and turn them into a savings breakdown
fn run_interactive(db: &Database, report: &AlternativesReport, hourly_rate: f64) -> Result<()> {
    let candidates: Vec<&Recommendation> = report
        .recommendations
        .iter()
        .filter(|r| {
            r.kind != RecommendationKind::Missing
                && r.current_tool.is_some()
                && r.savings.as_ref().is_some_and(|s| !s.money.is_empty())
        })
        .collect();

    if candidates.is_empty() {
        println!("{} Nothing substitutable to calculate savings for", "!".yellow());
        return Ok(());
    }

    let labels: Vec<String> = candidates
        .iter()
        .map(|rec| {
            format!(
                "{} → {} ({})",
                rec.current_tool.as_deref().unwrap_or("?"),
                rec.suggested_tool,
                rec.savings
                    .as_ref()
                    .map(|s| s.money.as_str())
                    .unwrap_or("?")
            )
        })
        .collect();

    let selected = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select the switches you would actually make")
        .items(&labels)
        .interact_opt()?;

    let Some(indices) = selected else {
        return Ok(());
    };
    if indices.is_empty() {
        println!("No switches selected.");
        return Ok(());
    }

    let changes: Result<Vec<ToolChange>> = indices
        .iter()
        .map(|&i| change_from_recommendation(db, candidates[i]))
        .collect();
    let breakdown = calculate_savings(changes?)?;

    println!();
    super::savings::display_breakdown(&breakdown, hourly_rate);
    Ok(())
}

/// Reconstruct a tool change from a recommendation, pricing both sides
///
/// The new tool's price comes from its stated cost (or the catalog); the
/// old tool's price is recovered as new price plus the claimed savings,
/// since the models rarely report the current cost directly.
fn change_from_recommendation(db: &Database, rec: &Recommendation) -> Result<ToolChange> {
    let current = rec.current_tool.clone().unwrap_or_default();

    let catalog_to_price = db
        .find_approved_by_name(&rec.suggested_tool)?
        .and_then(|t| t.monthly_price);
    let to_price = extract_money(&rec.estimated_cost)
        .or(catalog_to_price)
        .unwrap_or(0.0)
        .max(0.0);

    let claimed = rec
        .savings
        .as_ref()
        .and_then(|s| extract_money(&s.money))
        .unwrap_or(0.0)
        .max(0.0);
    let from_price = db
        .find_approved_by_name(&current)?
        .and_then(|t| t.monthly_price)
        .unwrap_or(to_price + claimed);

    let mut to = ToolCost::new(&rec.suggested_tool, to_price);
    to.affiliate_url = rec.affiliate_url.clone();

    Ok(ToolChange {
        from: ToolCost::new(&current, from_price),
        to,
        reasoning: rec.reason.clone(),
        category: rec.category.clone(),
    })
}
