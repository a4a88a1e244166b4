use muletrack_types::MuletrackResult;
use serde::{Deserialize, Serialize};

use crate::http_client::PlatformHttpClient;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub env_type: Option<String>,
    #[serde(default)]
    pub is_production: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BusinessGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl BusinessGroup {
    pub fn environment(&self, env_id: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.id == env_id)
    }
}

pub struct OrganizationClient {
    http: PlatformHttpClient,
    token: String,
}

impl OrganizationClient {
    pub fn new(http: PlatformHttpClient, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
        }
    }

    pub async fn business_group(&self, org_id: &str) -> MuletrackResult<BusinessGroup> {
        let request = self
            .http
            .get(&format!("/accounts/api/organizations/{}", org_id))
            .bearer_auth(&self.token);
        self.http.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_business_group() {
        let body = r#"{
            "id": "org-1",
            "name": "Retail",
            "ownerId": "u-1",
            "environments": [
                {"id": "env-1", "name": "Production", "type": "production", "isProduction": true},
                {"id": "env-2", "name": "Sandbox", "type": "sandbox", "isProduction": false}
            ]
        }"#;
        let group: BusinessGroup = serde_json::from_str(body).unwrap();
        assert_eq!(group.name, "Retail");
        assert_eq!(group.environments.len(), 2);
        assert!(group.environment("env-1").unwrap().is_production);
        assert_eq!(group.environment("env-2").unwrap().env_type.as_deref(), Some("sandbox"));
        assert!(group.environment("env-3").is_none());
    }
}
