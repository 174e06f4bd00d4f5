//! Config command handler

use crate::args::ConfigSubcommand;
use gpa_planner::config::Config;
use logger::{error, info};
use std::io::{self, Write};

/// Dispatch config subcommands
///
/// # Errors
/// Returns a printable message when a key is unknown, a value is rejected,
/// or the config file cannot be written.
pub fn run(
    subcommand: Option<ConfigSubcommand>,
    config: &mut Config,
    defaults: &Config,
) -> Result<(), String> {
    match subcommand {
        None => handle_config_get(config, None),
        Some(ConfigSubcommand::Get { key }) => handle_config_get(config, key),
        Some(ConfigSubcommand::Set { key, value }) => handle_config_set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => handle_config_unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset { yes }) => handle_config_reset(yes),
    }
}

fn handle_config_get(config: &Config, key: Option<String>) -> Result<(), String> {
    if let Some(k) = key {
        let value = config
            .get(&k)
            .ok_or_else(|| format!("✗ Unknown config key: '{k}'"))?;
        println!("{value}");
    } else {
        println!("\n=== Configuration ({}) ===\n", Config::get_config_file_path().display());
        print!("{config}");
    }
    Ok(())
}

fn save(config: &Config) -> Result<(), String> {
    config.save().map_err(|e| {
        error!("Failed to save config: {e}");
        format!("✗ Failed to save config: {e}")
    })
}

fn handle_config_set(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    config.set(key, value).map_err(|e| format!("✗ {e}"))?;
    save(config)?;
    info!("Config key {key} set");
    println!("✓ Set {key} = {value}");
    Ok(())
}

fn handle_config_unset(config: &mut Config, defaults: &Config, key: &str) -> Result<(), String> {
    config.unset(key, defaults).map_err(|e| format!("✗ {e}"))?;
    save(config)?;
    println!("✓ Reset {key} to default");
    Ok(())
}

fn handle_config_reset(skip_prompt: bool) -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    if !skip_prompt && !confirm("Are you sure you want to reset config to defaults? (y/n): ") {
        println!("✗ Reset cancelled");
        return Ok(());
    }

    Config::reset().map_err(|e| format!("✗ Failed to remove config file: {e}"))?;
    println!("✓ Config reset to defaults");
    Ok(())
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt}");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();
    let response = response.trim();
    response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes")
}
