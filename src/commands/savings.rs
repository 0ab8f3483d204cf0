//! The savings command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::savings::{MigrationComplexity, SavingsBreakdown, ToolChange, calculate_savings};

/// Compute a savings breakdown from a JSON file of tool changes
pub fn cmd_savings(file: &Path, hourly_rate: f64, json_output: bool) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let changes: Vec<ToolChange> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as a list of tool changes", file.display()))?;

    let breakdown = calculate_savings(changes)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    display_breakdown(&breakdown, hourly_rate);
    Ok(())
}

/// Render a savings breakdown
pub(super) fn display_breakdown(breakdown: &SavingsBreakdown, hourly_rate: f64) {
    println!("{}", "Savings Breakdown".bold());
    println!("{}", "=".repeat(30));
    println!();

    println!(
        "Money:     {} /month  ({} /year)",
        format!("${:.2}", breakdown.monetary.monthly).green().bold(),
        format!("${:.2}", breakdown.monetary.annual).green()
    );
    println!(
        "Time:      {} hrs/month  ({} hrs/year)",
        format!("{:.2}", breakdown.time.monthly).green().bold(),
        format!("{:.1}", breakdown.time.annual).green()
    );

    let complexity = match breakdown.migration.complexity {
        MigrationComplexity::Easy => "easy".green(),
        MigrationComplexity::Moderate => "moderate".yellow(),
        MigrationComplexity::Hard => "hard".red(),
    };
    println!(
        "Migration: {:.1} hours [{}]",
        breakdown.migration.time_required, complexity
    );

    if !breakdown.migration.steps.is_empty() {
        println!();
        for (i, step) in breakdown.migration.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step.dimmed());
        }
    }

    println!();
    let break_even = breakdown.break_even_months();
    if break_even.is_finite() {
        println!(
            "{} Breaks even on time after {} months",
            ">".cyan(),
            format!("{break_even:.1}").bold()
        );
    } else {
        println!(
            "{} No time savings; this switch only pays off in dollars",
            "!".yellow()
        );
    }
    println!(
        "{} First-year value at ${:.0}/hr: {}",
        ">".cyan(),
        hourly_rate,
        format!("${:.2}", breakdown.annual_value_at_rate(hourly_rate))
            .green()
            .bold()
    );
}
