use super::commands::{ConfigAction, OutputFormat};
use super::utils::{print_json, success, CYAN, GREY, RED, RESET};
use anyhow::{bail, Context, Result};
use muletrack::MuletrackConfig;
use std::path::Path;

pub fn handle_config(config_path: &Path, action: Option<ConfigAction>, format: OutputFormat) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            let config = MuletrackConfig::load(config_path)?;
            match format {
                OutputFormat::Json => print_json(&config)?,
                OutputFormat::Text => {
                    if !config_path.exists() {
                        println!("{}# No configuration file at {:?}, showing defaults{}", GREY, config_path, RESET);
                    }
                    let rendered = toml::to_string_pretty(&config)
                        .context("Failed to render configuration")?;
                    print!("{}", rendered);
                }
            }
        }
        Some(ConfigAction::Validate) => {
            if !config_path.exists() {
                println!("{}No configuration file found at {:?}{}", GREY, config_path, RESET);
                println!("Run '{}muletrack config init{}' to create one", CYAN, RESET);
                return Ok(());
            }
            match MuletrackConfig::load(config_path) {
                Ok(_) => success("Configuration is valid"),
                Err(e) => {
                    println!("{}[-]{} Configuration error: {}", RED, RESET, e);
                    bail!("invalid configuration");
                }
            }
        }
        Some(ConfigAction::Path) => {
            println!("{}", config_path.display());
        }
        Some(ConfigAction::Init { force }) => {
            if config_path.exists() && !force {
                bail!(
                    "Configuration already exists at {:?}; pass --force to overwrite",
                    config_path
                );
            }
            MuletrackConfig::default().save(config_path)?;
            success(format!("Wrote default configuration to {:?}", config_path));
        }
    }
    Ok(())
}
