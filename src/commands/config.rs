//! Configuration commands

use anyhow::Result;
use colored::Colorize;

use crate::config::StackRoastConfig;

/// Show the current configuration with key material redacted
pub fn cmd_config_show() -> Result<()> {
    let config = StackRoastConfig::load()?;

    println!("{}", "StackRoast Configuration".bold());
    println!("{}", "=".repeat(30));
    println!();

    println!(
        "Gemini key:      {}",
        key_state(config.ai.gemini_api_key.is_some(), "GEMINI_API_KEY")
    );
    println!(
        "OpenAI key:      {}",
        key_state(config.ai.openai_api_key.is_some(), "OPENAI_API_KEY")
    );
    println!("Gemini model:    {}", config.ai.gemini_model.cyan());
    println!("OpenAI model:    {}", config.ai.openai_model.cyan());
    println!("OpenAI base URL: {}", config.ai.openai_base_url);
    println!(
        "Timeout:         {}",
        config
            .ai
            .timeout_secs
            .map(|s| format!("{s}s"))
            .unwrap_or_else(|| "client default".to_string())
    );
    println!(
        "Streaming:       {}",
        if config.ai.streaming {
            "on".green().to_string()
        } else {
            "off".yellow().to_string()
        }
    );

    println!();
    println!("Config file: {}", StackRoastConfig::config_path()?.display());
    println!("Catalog db:  {}", StackRoastConfig::db_path()?.display());
    Ok(())
}

fn key_state(in_file: bool, env_var: &str) -> String {
    let in_env = std::env::var(env_var).is_ok_and(|v| !v.is_empty());
    match (in_env, in_file) {
        (true, _) => format!("set {}", format!("(from ${env_var})").dimmed())
            .green()
            .to_string(),
        (false, true) => "set (config file)".green().to_string(),
        (false, false) => "not set".red().to_string(),
    }
}

/// Set one configuration value
pub fn cmd_config_set(key: &str, value: &str) -> Result<()> {
    let mut config = StackRoastConfig::load()?;

    match key {
        "gemini-key" => config.ai.gemini_api_key = Some(value.to_string()),
        "openai-key" => config.ai.openai_api_key = Some(value.to_string()),
        "gemini-model" => config.ai.gemini_model = value.to_string(),
        "openai-model" => config.ai.openai_model = value.to_string(),
        "openai-base-url" => {
            config.ai.openai_base_url = value.trim_end_matches('/').to_string();
        }
        "timeout" => {
            let secs: u64 = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Timeout must be a number of seconds"))?;
            config.ai.timeout_secs = (secs > 0).then_some(secs);
        }
        "streaming" => {
            config.ai.streaming = matches!(value, "on" | "true" | "1" | "yes");
        }
        _ => {
            println!(
                "{} Unknown key '{}'. Valid keys: gemini-key, openai-key, gemini-model, openai-model, openai-base-url, timeout, streaming",
                "!".yellow(),
                key
            );
            return Ok(());
        }
    }

    config.save()?;
    println!("{} {} updated", "+".green(), key.cyan());
    println!(
        "  Config saved to: {}",
        StackRoastConfig::config_path()?.display()
    );
    Ok(())
}
