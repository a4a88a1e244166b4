use clap::{Parser, Subcommand, ValueEnum};
use muletrack::ResultFilter;
use muletrack_types::ControlPlane;
use std::path::PathBuf;

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "muletrack")]
#[command(version = BUILD_VERSION)]
#[command(about = "Muletrack - Find Anypoint applications nobody calls anymore")]
#[command(long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "FILE", help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(short = 'd', long, global = true, value_name = "DIR", env = "MULETRACK_DATA_DIR", help = "Data directory path")]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Only log warnings and errors")]
    pub quiet: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Write logs to file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text", help = "Output format")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum AppTypeFilter {
    #[default]
    All,
    Cloudhub,
    Rtf,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authenticate with a connected app")]
    #[command(long_about = "Authenticate with connected-app client credentials.\n\nThe token, its expiry and the monitoring datasource id are stored in the data directory.")]
    Connect {
        #[arg(long, env = "MULETRACK_CLIENT_ID", help = "Connected app client id")]
        client_id: String,
        #[arg(long, env = "MULETRACK_CLIENT_SECRET", hide_env_values = true, help = "Connected app client secret")]
        client_secret: String,
        #[arg(long, value_name = "PLANE", help = "Control plane (us, eu, gov); defaults to the configured one")]
        control_plane: Option<ControlPlane>,
    },

    #[command(about = "List environments of an organization and select one")]
    Environment {
        #[arg(long, value_name = "ORG", help = "Organization (business group) id")]
        org: String,
        #[arg(long, value_name = "N", help = "Select environment N without prompting")]
        select: Option<usize>,
    },

    #[command(about = "Show session status")]
    Status,

    #[command(about = "Report last call time and request count of applications")]
    #[command(long_about = "Report last call time and request count of applications.\n\nWithout --app every running CloudHub and Runtime Fabric application in the scope is monitored, five at a time.")]
    Monitor {
        #[arg(long, value_name = "ORG", help = "Organization id (defaults to the selected one)")]
        org: Option<String>,
        #[arg(long, value_name = "ENV", help = "Environment id (defaults to the selected one)")]
        env: Option<String>,
        #[arg(long, value_name = "ID", help = "Monitor a single application by id")]
        app: Option<String>,
        #[arg(long, value_name = "WINDOW", help = "Lookback for last-called, e.g. 15m")]
        last_called_window: Option<String>,
        #[arg(long, value_name = "WINDOW", help = "Lookback for request count, e.g. 24h")]
        request_count_window: Option<String>,
        #[arg(long, default_value = "all", help = "Keep all, nonempty or empty results")]
        filter: ResultFilter,
        #[arg(long, default_value = "all", help = "Application type to monitor")]
        app_type: AppTypeFilter,
        #[arg(long, value_name = "FILE", help = "Also write the results to a CSV file")]
        csv: Option<PathBuf>,
        #[arg(long, value_name = "SECS", help = "Give up on the batch after this many seconds")]
        deadline: Option<u64>,
    },

    #[command(about = "Exchange client applications")]
    Exchange {
        #[command(subcommand)]
        action: ExchangeAction,
    },

    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    #[command(about = "Show version information")]
    Version,
}

#[derive(Subcommand)]
pub enum ExchangeAction {
    #[command(about = "List client applications and their contracts")]
    List {
        #[arg(long, value_name = "ORG", help = "Organization id (defaults to the selected one)")]
        org: Option<String>,
        #[arg(long, value_name = "TOKEN", help = "Switch to an admin access token")]
        admin_token: Option<String>,
        #[arg(long, default_value = "all", help = "Keep all, nonempty or empty contract lists")]
        filter_contract: ResultFilter,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Show current configuration")]
    Show,
    #[command(about = "Validate configuration")]
    Validate,
    #[command(about = "Print the configuration file path")]
    Path,
    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(short, long, help = "Overwrite an existing file")]
        force: bool,
    },
}
