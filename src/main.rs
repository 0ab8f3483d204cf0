//! StackRoast: get your software stack roasted, then fix it
//!
//! `roast` generates an AI roast of a stack, `alternatives` suggests better
//! or cheaper tools, `savings` quantifies what a switch is worth. The tool
//! catalog behind suggestion reconciliation lives in a local SQLite
//! database managed by the `catalog` subcommands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod ai;
mod alternatives;
mod commands;
mod config;
mod db;
mod models;
mod roast;
mod savings;

use config::StackRoastConfig;
use db::Database;
use models::ToolStatus;

#[derive(Parser)]
#[command(name = "stackroast", version, about = "Roast your stack, then make it cheaper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roast a stack with an AI persona
    Roast {
        /// Name of the stack being roasted
        stack_name: String,
        /// Tools in the stack, as `name[:category[:price]]`
        #[arg(short, long, required = true, num_args = 1..)]
        tools: Vec<String>,
        /// Persona key (see `stackroast personas`); random when omitted
        #[arg(short, long)]
        persona: Option<String>,
        /// Disable streaming output even when the provider supports it
        #[arg(long)]
        no_stream: bool,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest replacements, missing tools and budget alternatives
    Alternatives {
        /// Name of the stack
        stack_name: String,
        /// Tools in the stack, as `name[:category[:price]]`
        #[arg(short, long, required = true, num_args = 1..)]
        tools: Vec<String>,
        /// Current monthly cost; summed from catalog prices when omitted
        #[arg(long)]
        monthly_cost: Option<f64>,
        /// Expected user count for budget context
        #[arg(long)]
        users: Option<u32>,
        /// Budget level (e.g. tight, medium, comfortable)
        #[arg(long)]
        budget: Option<String>,
        /// What the stack is for (e.g. startup, side project)
        #[arg(long)]
        use_case: Option<String>,
        /// Hourly rate used for savings math in interactive mode
        #[arg(long, default_value_t = 75.0)]
        rate: f64,
        /// Pick switches interactively and get a savings breakdown
        #[arg(short, long)]
        interactive: bool,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Calculate savings for a set of tool changes
    Savings {
        /// JSON file containing a list of tool changes
        #[arg(short, long)]
        file: PathBuf,
        /// Hourly rate used to value time savings
        #[arg(long, default_value_t = 75.0)]
        rate: f64,
        /// Emit the breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available roast personas
    Personas,

    /// Manage the tool catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// Add a tool to the catalog
    Add {
        name: String,
        #[arg(short, long)]
        category: Option<String>,
        /// Monthly price in dollars
        #[arg(short, long)]
        price: Option<f64>,
        #[arg(short, long)]
        website: Option<String>,
        #[arg(long)]
        affiliate_url: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Approve immediately instead of leaving the entry pending
        #[arg(long)]
        approve: bool,
    },
    /// List catalog entries
    List {
        /// Filter by status: pending, approved or rejected
        #[arg(short, long)]
        status: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Search the catalog by name or category
    Search { query: String },
    /// Approve a pending tool
    Approve { name: String },
    /// Reject a tool
    Reject { name: String },
    /// Seed the catalog with a starter set of common SaaS tools
    Seed,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set a configuration value
    Set { key: String, value: String },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "!".red());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = StackRoastConfig::load()?;

    match cli.command {
        Commands::Roast {
            stack_name,
            tools,
            persona,
            no_stream,
            json,
        } => {
            let db = open_db()?;
            commands::cmd_roast(
                &db,
                &config,
                &stack_name,
                &tools,
                persona.as_deref(),
                no_stream,
                json,
            )
        }
        Commands::Alternatives {
            stack_name,
            tools,
            monthly_cost,
            users,
            budget,
            use_case,
            rate,
            interactive,
            json,
        } => {
            let db = open_db()?;
            commands::cmd_alternatives(
                &db,
                &config,
                &stack_name,
                &tools,
                monthly_cost,
                users,
                budget,
                use_case,
                rate,
                interactive,
                json,
            )
        }
        Commands::Savings { file, rate, json } => commands::cmd_savings(&file, rate, json),
        Commands::Personas => commands::cmd_personas(),
        Commands::Catalog { command } => {
            let db = open_db()?;
            match command {
                CatalogCommands::Add {
                    name,
                    category,
                    price,
                    website,
                    affiliate_url,
                    description,
                    approve,
                } => commands::cmd_catalog_add(
                    &db,
                    &name,
                    category.as_deref(),
                    price,
                    website.as_deref(),
                    affiliate_url.as_deref(),
                    description.as_deref(),
                    approve,
                ),
                CatalogCommands::List { status, json } => {
                    commands::cmd_catalog_list(&db, status.as_deref().map(ToolStatus::from), json)
                }
                CatalogCommands::Search { query } => commands::cmd_catalog_search(&db, &query),
                CatalogCommands::Approve { name } => {
                    commands::cmd_catalog_status(&db, &name, ToolStatus::Approved)
                }
                CatalogCommands::Reject { name } => {
                    commands::cmd_catalog_status(&db, &name, ToolStatus::Rejected)
                }
                CatalogCommands::Seed => commands::cmd_catalog_seed(&db),
            }
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::cmd_config_show(),
            ConfigCommands::Set { key, value } => commands::cmd_config_set(&key, &value),
        },
    }
}

fn open_db() -> Result<Database> {
    Database::open(&StackRoastConfig::db_path()?)
}
