mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{
    handle_config, init_logging, run_connect, run_environment, run_exchange_list, run_monitor,
    show_status, show_version, Cli, Commands, ExchangeAction, MonitorArgs, Paths, RED, RESET,
};
use muletrack::{MuletrackConfig, SessionStore};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}[-]{} {:#}", RED, RESET, e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let paths = Paths::resolve(&cli);

    // A broken config must not prevent `config validate` from reporting it.
    let config = MuletrackConfig::load(&paths.config);
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_logging(&cli, &logging)?;

    let store = SessionStore::in_data_dir(&paths.data_dir);
    let format = cli.format;

    match cli.command {
        Commands::Connect {
            client_id,
            client_secret,
            control_plane,
        } => {
            run_connect(&config?, &store, &client_id, &client_secret, control_plane, format).await?;
        }
        Commands::Environment { org, select } => {
            run_environment(&config?, &store, &org, select, format).await?;
        }
        Commands::Status => {
            show_status(&store, format)?;
        }
        Commands::Monitor {
            org,
            env,
            app,
            last_called_window,
            request_count_window,
            filter,
            app_type,
            csv,
            deadline,
        } => {
            let args = MonitorArgs {
                org,
                env,
                app,
                last_called_window,
                request_count_window,
                filter,
                app_type,
                csv,
                deadline,
            };
            run_monitor(&config?, &store, args, format).await?;
        }
        Commands::Exchange { action } => match action {
            ExchangeAction::List {
                org,
                admin_token,
                filter_contract,
            } => {
                run_exchange_list(&config?, &store, org, admin_token, filter_contract, format).await?;
            }
        },
        Commands::Config { action } => {
            handle_config(&paths.config, action, format)?;
        }
        Commands::Version => {
            show_version();
        }
    }

    Ok(())
}
