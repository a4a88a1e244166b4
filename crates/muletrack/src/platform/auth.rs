use chrono::{Duration, Utc};
use muletrack_types::{ControlPlane, MuletrackError, MuletrackResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::http_client::PlatformHttpClient;
use crate::session::{Session, TokenKind};

const TOKEN_PATH: &str = "/accounts/api/v2/oauth2/token";
const BOOTDATA_PATH: &str = "/monitoring/api/visualizer/api/bootdata";

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BootData {
    #[serde(rename = "Settings")]
    settings: BootSettings,
}

#[derive(Debug, Deserialize)]
struct BootSettings {
    datasources: BootDatasources,
}

#[derive(Debug, Deserialize)]
struct BootDatasources {
    influxdb: InfluxDatasource,
}

#[derive(Debug, Deserialize)]
struct InfluxDatasource {
    id: u64,
}

/// Exchanges connected-app credentials for an access token.
pub async fn login(
    http: &PlatformHttpClient,
    client_id: &str,
    client_secret: &str,
) -> MuletrackResult<TokenResponse> {
    let request = http.post(TOKEN_PATH).json(&TokenRequest {
        client_id,
        client_secret,
        grant_type: "client_credentials",
    });

    let token: TokenResponse = http
        .send_json(request)
        .await
        .map_err(|e| MuletrackError::Session(format!("error authenticating: {}", e)))?;

    if token.access_token.is_empty() {
        return Err(MuletrackError::Session(
            "error authenticating: empty access token".into(),
        ));
    }

    debug!(
        "Obtained {} token valid for {}s",
        token.token_type.as_deref().unwrap_or("bearer"),
        token.expires_in
    );
    Ok(token)
}

/// Reads the id of the monitoring datasource that metrics queries are proxied to.
pub async fn monitoring_datasource_id(http: &PlatformHttpClient, token: &str) -> MuletrackResult<u64> {
    let request = http.get(BOOTDATA_PATH).bearer_auth(token);
    let boot: BootData = http
        .send_json(request)
        .await
        .map_err(|e| MuletrackError::Session(format!("error retrieving InfluxDB ID: {}", e)))?;
    Ok(boot.settings.datasources.influxdb.id)
}

/// Performs the full connect sequence and returns a fresh session. Org and env
/// selections from `previous` are carried over when the client id matches.
pub async fn connect(
    http: &PlatformHttpClient,
    control_plane: ControlPlane,
    client_id: &str,
    client_secret: &str,
    previous: Option<&Session>,
) -> MuletrackResult<Session> {
    let token = login(http, client_id, client_secret).await?;
    let datasource_id = monitoring_datasource_id(http, &token.access_token).await?;

    let (org_id, env_id) = previous
        .filter(|p| p.client_id == client_id && p.control_plane == control_plane)
        .map(|p| (p.org_id.clone(), p.env_id.clone()))
        .unwrap_or((None, None));

    let session = Session {
        control_plane,
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
        access_token: token.access_token,
        admin_access_token: None,
        token_kind: TokenKind::Connected,
        expires_at: Utc::now() + Duration::seconds(token.expires_in.max(0)),
        datasource_id,
        org_id,
        env_id,
    };

    info!(
        "Connected to {} control plane as {} (datasource {})",
        control_plane, client_id, datasource_id
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bootdata() {
        let body = r#"{"Settings":{"datasources":{"influxdb":{"id":1234,"name":"influxdb"}},"theme":"light"}}"#;
        let boot: BootData = serde_json::from_str(body).unwrap();
        assert_eq!(boot.settings.datasources.influxdb.id, 1234);
    }

    #[test]
    fn test_parse_token_response() {
        let body = r#"{"access_token":"abc","expires_in":3600,"token_type":"bearer"}"#;
        let token: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn test_token_request_shape() {
        let json = serde_json::to_value(TokenRequest {
            client_id: "id",
            client_secret: "secret",
            grant_type: "client_credentials",
        })
        .unwrap();
        assert_eq!(json["grant_type"], "client_credentials");
        assert_eq!(json["client_id"], "id");
    }
}
