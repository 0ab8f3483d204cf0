//! The roast command

use std::io::Write;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::ai::gateway::{ProviderConfig, ProviderGateway};
use crate::ai::types::RoastResult;
use crate::config::StackRoastConfig;
use crate::db::Database;
use crate::roast::RoastGenerator;

use super::{resolve_tools, spinner};

/// Roast a stack
pub fn cmd_roast(
    db: &Database,
    config: &StackRoastConfig,
    stack_name: &str,
    tool_args: &[String],
    persona: Option<&str>,
    no_stream: bool,
    json_output: bool,
) -> Result<()> {
    let tools = resolve_tools(db, tool_args)?;
    let gateway = ProviderGateway::new(&ProviderConfig::from(&config.ai));
    let generator = RoastGenerator::new(&gateway);

    let stream = config.ai.streaming && !no_stream && !json_output;

    let result = if stream {
        println!("{} Roasting '{}'...", ">".cyan(), stack_name.bold());
        println!();

        let mut printed = 0;
        let result = generator.generate_streaming(
            stack_name,
            &tools,
            persona,
            &mut |chunk, accumulated| {
                // The buffered fallback restarts the text; break the line so
                // the replayed roast reads cleanly below the dropped stream
                if accumulated.len() < printed {
                    println!();
                    println!();
                }
                printed = accumulated.len();
                print!("{chunk}");
                let _ = std::io::stdout().flush();
            },
        )?;
        println!();
        result
    } else {
        let sp = if json_output {
            None
        } else {
            Some(spinner("Roasting your stack..."))
        };
        let result = generator.generate(stack_name, &tools, persona);
        if let Some(sp) = sp {
            sp.finish_and_clear();
        }
        let result = result?;

        if !json_output {
            println!("{} Roasting '{}'...", ">".cyan(), stack_name.bold());
            println!();
            println!("{}", result.roast_text);
        }
        result
    };

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize roast")?
        );
        return Ok(());
    }

    println!();
    print_score(&result);
    Ok(())
}

fn print_score(result: &RoastResult) {
    let score = format!("{}/100", result.burn_score);
    let colored_score = match result.burn_score {
        80.. => score.red().bold(),
        60..=79 => score.yellow().bold(),
        _ => score.green().bold(),
    };
    println!(
        "{} Burn score: {}  (roasted by {})",
        ">".cyan(),
        colored_score,
        result.persona_name.cyan()
    );
}
