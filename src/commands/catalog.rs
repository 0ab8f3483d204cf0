//! Catalog management commands

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};

use crate::db::Database;
use crate::models::{CatalogTool, ToolStatus};

/// Add a tool to the catalog
#[allow(clippy::too_many_arguments)]
pub fn cmd_catalog_add(
    db: &Database,
    name: &str,
    category: Option<&str>,
    price: Option<f64>,
    website: Option<&str>,
    affiliate_url: Option<&str>,
    description: Option<&str>,
    approve: bool,
) -> Result<()> {
    if db.get_tool_by_name(name)?.is_some() {
        println!("{} '{}' is already in the catalog", "!".yellow(), name);
        return Ok(());
    }

    let mut tool = CatalogTool::new(name);
    if let Some(category) = category {
        tool = tool.with_category(&category.to_lowercase());
    }
    if let Some(price) = price {
        tool = tool.with_monthly_price(price);
    }
    if let Some(website) = website {
        tool = tool.with_website(website);
    }
    if let Some(url) = affiliate_url {
        tool = tool.with_affiliate_url(url);
    }
    if let Some(description) = description {
        tool = tool.with_description(description);
    }
    if approve {
        tool = tool.approved();
    }

    db.insert_tool(&tool)?;
    println!(
        "{} Added '{}' to the catalog [{}]",
        "+".green(),
        name.cyan(),
        status_label(tool.status)
    );
    if !approve {
        println!(
            "  {} Pending tools are ignored by recommendations until approved",
            ">".dimmed()
        );
    }
    Ok(())
}

/// List catalog entries, optionally filtered by status
pub fn cmd_catalog_list(db: &Database, status: Option<ToolStatus>, json_output: bool) -> Result<()> {
    let tools = db.list_tools(status)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    if tools.is_empty() {
        println!("{} Catalog is empty. Try {}", "!".yellow(), "stackroast catalog seed".cyan());
        return Ok(());
    }

    print_tool_table(&tools);
    println!(
        "{} {} tool{} in the catalog",
        ">".cyan(),
        tools.len(),
        if tools.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

/// Search the catalog by name or category substring
pub fn cmd_catalog_search(db: &Database, query: &str) -> Result<()> {
    let tools = db.search_tools(query)?;

    if tools.is_empty() {
        println!("{} No catalog entries match '{}'", "!".yellow(), query);
        return Ok(());
    }

    print_tool_table(&tools);
    Ok(())
}

/// Approve or reject a pending tool
pub fn cmd_catalog_status(db: &Database, name: &str, status: ToolStatus) -> Result<()> {
    if db.set_tool_status(name, status)? {
        println!("{} '{}' is now {}", "+".green(), name.cyan(), status_label(status));
    } else {
        println!("{} No catalog entry named '{}'", "!".yellow(), name);
    }
    Ok(())
}

/// Seed the catalog with the starter tool set
pub fn cmd_catalog_seed(db: &Database) -> Result<()> {
    let inserted = db.seed_catalog()?;
    let total = db.tool_count()?;

    if inserted == 0 {
        println!("{} Catalog already seeded ({} entries)", ">".cyan(), total);
    } else {
        println!(
            "{} Seeded {} tool{} (catalog now has {} entries)",
            "+".green(),
            inserted,
            if inserted == 1 { "" } else { "s" },
            total
        );
    }
    Ok(())
}

fn print_tool_table(tools: &[CatalogTool]) {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Category", "Price", "Status", "Website"]);

    for tool in tools {
        table.add_row(vec![
            tool.name.clone(),
            tool.category.clone().unwrap_or_else(|| "-".to_string()),
            tool.monthly_price
                .map(|p| format!("${p:.2}/mo"))
                .unwrap_or_else(|| "-".to_string()),
            tool.status.to_string(),
            tool.website.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{table}");
}

fn status_label(status: ToolStatus) -> String {
    match status {
        ToolStatus::Approved => "approved".green().to_string(),
        ToolStatus::Pending => "pending".yellow().to_string(),
        ToolStatus::Rejected => "rejected".red().to_string(),
    }
}
