use super::commands::OutputFormat;
use super::utils::{print_json, rule, CYAN, GREEN, GREY, RED, RESET, YELLOW};
use anyhow::Result;
use chrono::Utc;
use muletrack::SessionStore;

pub fn show_status(store: &SessionStore, format: OutputFormat) -> Result<()> {
    let Some(session) = store.load()? else {
        match format {
            OutputFormat::Json => print_json(&serde_json::json!({ "connected": false }))?,
            OutputFormat::Text => {
                println!("{}* Not connected{}", GREY, RESET);
                println!();
                println!("Connect with: {}muletrack connect --client-id <ID> --client-secret <SECRET>{}", CYAN, RESET);
            }
        }
        return Ok(());
    };

    let now = Utc::now();
    let usable = session.is_usable(now);

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "connected": true,
            "usable": usable,
            "control_plane": session.control_plane,
            "client_id": session.client_id,
            "token_kind": session.token_kind,
            "expires_at": session.expires_at,
            "datasource_id": session.datasource_id,
            "org_id": session.org_id,
            "env_id": session.env_id,
        }))?,
        OutputFormat::Text => {
            if usable {
                println!("{}* Session: ACTIVE{}", GREEN, RESET);
            } else {
                println!("{}* Session: EXPIRED{}", RED, RESET);
            }
            rule(50);
            println!("Control Plane:  {}{}{}", CYAN, session.control_plane.host(), RESET);
            println!("Client ID:      {}{}{}", YELLOW, session.client_id, RESET);
            println!("Token:          {}{}{}", CYAN, session.token_kind, RESET);
            println!("Expires:        {}{}{}", GREY, session.expires_at.to_rfc2822(), RESET);
            println!("Datasource:     {}{}{}", GREY, session.datasource_id, RESET);
            println!(
                "Organization:   {}{}{}",
                CYAN,
                session.org_id.as_deref().unwrap_or("-"),
                RESET
            );
            println!(
                "Environment:    {}{}{}",
                CYAN,
                session.env_id.as_deref().unwrap_or("-"),
                RESET
            );
            rule(50);
        }
    }
    Ok(())
}
