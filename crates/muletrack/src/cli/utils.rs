use super::commands::Cli;
use anyhow::{Context, Result};
use muletrack::config::LoggingConfig;
use muletrack::MuletrackConfig;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const GREEN: &str = "\x1b[38;5;46m";
pub const CYAN: &str = "\x1b[38;5;51m";
pub const YELLOW: &str = "\x1b[38;5;226m";
pub const GREY: &str = "\x1b[38;5;245m";
pub const RED: &str = "\x1b[38;5;196m";
pub const RESET: &str = "\x1b[0m";

fn filter_directive(cli: &Cli, logging: &LoggingConfig) -> String {
    if cli.quiet {
        return "warn".to_string();
    }
    match cli.verbose {
        0 => logging.level.as_filter().to_string(),
        1 => "info,muletrack=debug".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Logs always go to stderr or the log file; stdout is reserved for results.
pub fn init_logging(cli: &Cli, logging: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(cli, logging)));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if let Some(ref log_file) = cli.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .with_context(|| format!("Failed to open log file {:?}", log_file))?;
        let file_layer = fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false);
        subscriber.with(file_layer).init();
    } else if logging.json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(cli.verbose >= 2);
        subscriber.with(stderr_layer).init();
    }
    Ok(())
}

pub struct Paths {
    pub data_dir: PathBuf,
    pub config: PathBuf,
}

impl Paths {
    pub fn resolve(cli: &Cli) -> Self {
        let data_dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(MuletrackConfig::default_data_dir);
        let config = cli
            .config
            .clone()
            .unwrap_or_else(|| MuletrackConfig::default_path(&data_dir));
        Self { data_dir, config }
    }
}

pub fn success(message: impl std::fmt::Display) {
    println!("{}[+]{} {}", GREEN, RESET, message);
}

pub fn rule(width: usize) {
    println!("{}{}{}", GREY, "═".repeat(width), RESET);
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", muletrack::output::render_json(value)?);
    Ok(())
}
