// ABOUTME: CLI config command - show or write the effective configuration
//
// Prints the merged configuration (files plus command-line overrides) as
// TOML or JSON; --init saves it as the user config file.

use anyhow::Result;

use super::{ConfigArgs, OutputFormat};
use crate::config::AppConfig;

/// Execute the config command
pub fn execute(args: &ConfigArgs, format: OutputFormat, config: &AppConfig) -> Result<()> {
    if args.init {
        let path = config.save()?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Text => {
            println!("# Searched, most specific first:");
            for path in AppConfig::get_config_paths() {
                let marker = if path.exists() { "found" } else { "missing" };
                println!("#   {} ({marker})", path.display());
            }
            println!();
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
