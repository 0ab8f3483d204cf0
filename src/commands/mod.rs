//! Command implementations
//!
//! Each command takes its dependencies (database, config) explicitly and
//! renders with colored glyph prefixes: `>` for progress notes, `+` for
//! success, `!` for warnings.

use anyhow::{Result, bail};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::ai::personas::PERSONAS;
use crate::db::Database;
use crate::models::ToolRef;

mod alternatives;
mod catalog;
mod config;
mod roast;
mod savings;

pub use alternatives::cmd_alternatives;
pub use catalog::{cmd_catalog_add, cmd_catalog_list, cmd_catalog_search, cmd_catalog_seed, cmd_catalog_status};
pub use config::{cmd_config_set, cmd_config_show};
pub use roast::cmd_roast;
pub use savings::cmd_savings;

/// Spinner with the house style, already ticking
fn spinner(message: &str) -> ProgressBar {
    let sp = ProgressBar::new_spinner();
    sp.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    sp.set_message(message.to_string());
    sp.enable_steady_tick(std::time::Duration::from_millis(80));
    sp
}

/// Parse a `name[:category[:price]]` tool argument
fn parse_tool_arg(arg: &str) -> Result<ToolRef> {
    let mut parts = arg.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        bail!("Empty tool name in '{arg}'");
    }

    let mut tool = ToolRef::new(name);
    if let Some(category) = parts.next() {
        let category = category.trim();
        if !category.is_empty() {
            tool.category = Some(category.to_lowercase());
        }
    }
    if let Some(price) = parts.next() {
        tool.monthly_price = Some(
            price
                .trim()
                .trim_start_matches('$')
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid price '{price}' in '{arg}'"))?,
        );
    }

    Ok(tool)
}

/// Parse tool arguments and fill category/price gaps from the catalog
///
/// Explicit values on the command line always win over catalog data.
fn resolve_tools(db: &Database, args: &[String]) -> Result<Vec<ToolRef>> {
    let mut tools = Vec::with_capacity(args.len());

    for arg in args {
        let mut tool = parse_tool_arg(arg)?;
        if tool.category.is_none() || tool.monthly_price.is_none() {
            if let Some(entry) = db.find_approved_by_name(&tool.name)? {
                if tool.category.is_none() {
                    tool.category = entry.category;
                }
                if tool.monthly_price.is_none() {
                    tool.monthly_price = entry.monthly_price;
                }
            }
        }
        tools.push(tool);
    }

    Ok(tools)
}

/// Summed monthly price of the tools whose price is known
fn known_monthly_cost(tools: &[ToolRef]) -> Option<f64> {
    let total: f64 = tools.iter().filter_map(|t| t.monthly_price).sum();
    (total > 0.0).then_some(total)
}

/// List the available roast personas
pub fn cmd_personas() -> Result<()> {
    println!("{}", "Available personas".bold());
    println!();
    for persona in PERSONAS {
        println!("  {} {}", persona.key.cyan(), format!("({})", persona.name).bold());
        println!("    {}", persona.style.dimmed());
    }
    println!();
    println!(
        "  {} Pick one with {}, or omit it for a random persona",
        ">".cyan(),
        "stackroast roast --persona <key>".cyan()
    );
    Ok(())
}
