use muletrack_types::{ControlPlane, MuletrackError, MuletrackResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::HttpConfig;

#[derive(Clone, Debug)]
pub struct PlatformHttpClient {
    client: Client,
    base_url: String,
}

impl PlatformHttpClient {
    pub fn new(control_plane: ControlPlane, config: &HttpConfig) -> MuletrackResult<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| control_plane.host().to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| MuletrackError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("HTTP GET: {}", url);
        self.client.get(url)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("HTTP POST: {}", url);
        self.client.post(url)
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> MuletrackResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| MuletrackError::Network(format!("Request failed: {}", e)))?;

        let body = read_success_body(response).await?;
        decode_json(&body)
    }
}

pub async fn read_success_body(response: Response) -> MuletrackResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| MuletrackError::Network(format!("Failed to read response body: {}", e)))?;

    if !status.is_success() {
        return Err(MuletrackError::Api(format!(
            "non-OK status {}: {}",
            status.as_u16(),
            truncate(&body, 512)
        )));
    }

    trace!("HTTP {} ({} bytes)", status.as_u16(), body.len());
    Ok(body)
}

pub fn decode_json<T: DeserializeOwned>(body: &str) -> MuletrackResult<T> {
    serde_json::from_str(body)
        .map_err(|e| MuletrackError::Decode(format!("Failed to decode response: {}", e)))
}

fn truncate(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_client_uses_control_plane_host() {
        let client = PlatformHttpClient::new(ControlPlane::Eu, &HttpConfig::default()).unwrap();
        assert_eq!(client.base_url(), "https://eu1.anypoint.mulesoft.com");
        assert_eq!(
            client.url("/armui/api/v1/applications"),
            "https://eu1.anypoint.mulesoft.com/armui/api/v1/applications"
        );
    }

    #[test]
    fn test_base_url_override() {
        let config = HttpConfig {
            base_url: Some("http://localhost:9000/".into()),
            ..HttpConfig::default()
        };
        let client = PlatformHttpClient::new(ControlPlane::Us, &config).unwrap();
        assert_eq!(client.url("accounts/api/v2/oauth2/token"), "http://localhost:9000/accounts/api/v2/oauth2/token");
    }

    #[test]
    fn test_decode_json_errors_are_decode_errors() {
        #[derive(Debug, Deserialize)]
        struct Body {
            #[allow(dead_code)]
            id: u32,
        }

        assert!(decode_json::<Body>("{\"id\": 3}").is_ok());
        assert!(matches!(decode_json::<Body>("<html>"), Err(MuletrackError::Decode(_))));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let body = "ééééé";
        assert_eq!(truncate(body, 3), "é");
        assert_eq!(truncate("short", 512), "short");
    }
}
