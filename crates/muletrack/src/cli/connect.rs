use super::commands::OutputFormat;
use super::utils::{print_json, success, CYAN, GREY, RESET};
use anyhow::{Context, Result};
use muletrack::platform::auth;
use muletrack::{MuletrackConfig, PlatformHttpClient, SessionStore};
use muletrack_types::ControlPlane;

pub async fn run_connect(
    config: &MuletrackConfig,
    store: &SessionStore,
    client_id: &str,
    client_secret: &str,
    control_plane: Option<ControlPlane>,
    format: OutputFormat,
) -> Result<()> {
    let control_plane = control_plane.unwrap_or(config.control_plane);
    let http = PlatformHttpClient::new(control_plane, &config.http)?;

    let previous = store.load_previous();
    let session = auth::connect(&http, control_plane, client_id, client_secret, previous.as_ref())
        .await
        .context("Connect failed")?;
    store.save(&session)?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "control_plane": session.control_plane,
            "client_id": session.client_id,
            "expires_at": session.expires_at,
            "datasource_id": session.datasource_id,
            "org_id": session.org_id,
            "env_id": session.env_id,
        }))?,
        OutputFormat::Text => {
            success(format!("Connected to {}{}{}", CYAN, control_plane.host(), RESET));
            println!(
                "    Token expires {}{}{}",
                GREY,
                session.expires_at.to_rfc2822(),
                RESET
            );
            if session.scope().is_none() {
                println!(
                    "    Next: {}muletrack environment --org <ORG_ID>{}",
                    CYAN, RESET
                );
            }
        }
    }
    Ok(())
}
