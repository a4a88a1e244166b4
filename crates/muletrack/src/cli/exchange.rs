use super::commands::OutputFormat;
use super::utils::{print_json, GREY, RESET};
use anyhow::{bail, Context, Result};
use muletrack::monitor::{collect_contracts, ClientAppContracts};
use muletrack::output::client_apps_table;
use muletrack::platform::{ExchangeApi, ExchangeClient};
use muletrack::{FanOut, MuletrackConfig, PlatformHttpClient, ResultFilter, SessionStore};
use std::sync::Arc;
use tracing::info;

pub async fn run_exchange_list(
    config: &MuletrackConfig,
    store: &SessionStore,
    org: Option<String>,
    admin_token: Option<String>,
    filter_contract: ResultFilter,
    format: OutputFormat,
) -> Result<()> {
    let mut session = store.require()?;
    if let Some(token) = admin_token {
        session.use_admin_token(token);
        store.save(&session)?;
        info!("Switched session to the admin access token");
    }
    session.ensure_usable(chrono::Utc::now())?;

    let Some(org) = org.or_else(|| session.org_id.clone()) else {
        bail!("Please provide --org, or select one with 'muletrack environment'");
    };

    let http = PlatformHttpClient::new(session.control_plane, &config.http)?;
    let exchange: Arc<dyn ExchangeApi> = Arc::new(ExchangeClient::new(http, session.token()));

    let apps = exchange
        .client_apps(&org, true)
        .await
        .with_context(|| format!("Failed to list client applications of {}", org))?;
    let total = apps.len();

    let rows = collect_contracts(&FanOut::default(), exchange, &org, apps).await;
    let rows = filter_contract.apply_by(rows, ClientAppContracts::has_contracts);

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Text => {
            println!("* Found {} client applications.", total);
            println!(
                "* After applying filter '{}', {} remain.",
                filter_contract,
                rows.len()
            );
            if rows.is_empty() {
                println!("{}No client applications match the filter criteria.{}", GREY, RESET);
            } else {
                println!();
                print!("{}", client_apps_table(&rows).render());
            }
        }
    }
    Ok(())
}
