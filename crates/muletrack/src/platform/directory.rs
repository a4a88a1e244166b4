use async_trait::async_trait;
use muletrack_types::{AppHandle, DeploymentTarget, MuletrackResult, Scope};
use serde::Deserialize;
use tracing::debug;

use crate::config::DirectoryConfig;
use crate::http_client::PlatformHttpClient;

const APPLICATIONS_PATH: &str = "/armui/api/v1/applications";

/// Lists the applications deployed in a scope.
#[async_trait]
pub trait AppDirectory: Send + Sync {
    async fn list_applications(
        &self,
        scope: &Scope,
        filters: &[AppFilter],
    ) -> MuletrackResult<Vec<AppHandle>>;
}

/// Static predicate over an application's deployment target and status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppFilter {
    Running(DirectoryConfig),
    CloudHub,
    RuntimeFabric,
    CloudHubOrRuntimeFabric,
    Named(String),
}

impl AppFilter {
    pub fn matches(&self, app: &AppHandle) -> bool {
        match self {
            AppFilter::Running(statuses) => {
                let status = app.status.as_deref();
                match app.target {
                    DeploymentTarget::CloudHub { .. } => {
                        status == Some(statuses.cloudhub_running_status.as_str())
                    }
                    DeploymentTarget::RuntimeFabric { .. } => {
                        status == Some(statuses.rtf_running_status.as_str())
                    }
                    DeploymentTarget::Other { .. } => true,
                }
            }
            AppFilter::CloudHub => app.target.is_cloudhub(),
            AppFilter::RuntimeFabric => app.target.is_runtime_fabric(),
            AppFilter::CloudHubOrRuntimeFabric => app.target.is_supported(),
            AppFilter::Named(name) => &app.name == name,
        }
    }
}

/// Keeps the applications matching every filter, in input order.
pub fn filter_apps(apps: Vec<AppHandle>, filters: &[AppFilter]) -> Vec<AppHandle> {
    apps.into_iter()
        .filter(|app| filters.iter().all(|f| f.matches(app)))
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct AppsResponse {
    #[serde(default)]
    pub data: Vec<RawApp>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawApp {
    pub id: String,
    #[serde(default)]
    pub target: RawTarget,
    #[serde(default)]
    pub artifact: RawArtifact,
    #[serde(default)]
    pub last_reported_status: Option<String>,
    #[serde(default)]
    pub application: Option<RawApplicationStatus>,
    #[serde(default)]
    pub details: RawDetails,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTarget {
    #[serde(rename = "type", default)]
    pub target_type: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawArtifact {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawApplicationStatus {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDetails {
    #[serde(default)]
    pub domain: Option<String>,
}

impl From<RawApp> for AppHandle {
    fn from(raw: RawApp) -> Self {
        let subtype = raw.target.subtype.unwrap_or_default();
        let name = raw.artifact.name;

        let (target, status) = match (raw.target.target_type.as_str(), subtype.as_str()) {
            ("CLOUDHUB", _) => (
                DeploymentTarget::CloudHub {
                    domain: raw.details.domain.unwrap_or_else(|| name.clone()),
                },
                raw.last_reported_status,
            ),
            ("MC", "runtime-fabric") => (
                DeploymentTarget::RuntimeFabric {
                    cluster_id: raw.target.id.unwrap_or_default(),
                    artifact_name: name.clone(),
                },
                raw.application.and_then(|a| a.status),
            ),
            ("MC", _) => (DeploymentTarget::Other { label: subtype.clone() }, raw.last_reported_status),
            (other, _) => (
                DeploymentTarget::Other { label: other.to_string() },
                raw.last_reported_status,
            ),
        };

        AppHandle {
            id: raw.id,
            name,
            target,
            status,
        }
    }
}

/// Application directory backed by the Runtime Manager UI API.
pub struct ArmDirectory {
    http: PlatformHttpClient,
    token: String,
}

impl ArmDirectory {
    pub fn new(http: PlatformHttpClient, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
        }
    }
}

#[async_trait]
impl AppDirectory for ArmDirectory {
    async fn list_applications(
        &self,
        scope: &Scope,
        filters: &[AppFilter],
    ) -> MuletrackResult<Vec<AppHandle>> {
        let request = self
            .http
            .get(APPLICATIONS_PATH)
            .header("x-anypnt-org-id", &scope.org_id)
            .header("x-anypnt-env-id", &scope.env_id)
            .bearer_auth(&self.token);

        let response: AppsResponse = self.http.send_json(request).await?;
        debug!(
            "Directory returned {} of {} applications for {}",
            response.data.len(),
            response.total,
            scope
        );

        let apps = response.data.into_iter().map(AppHandle::from).collect();
        Ok(filter_apps(apps, filters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPS_JSON: &str = r#"{
        "data": [
            {
                "id": "ch-1",
                "target": {"type": "CLOUDHUB"},
                "artifact": {"name": "orders-api", "lastUpdateTime": 1700000000000},
                "lastReportedStatus": "STARTED",
                "details": {"domain": "orders-api-prod"}
            },
            {
                "id": "ch-2",
                "target": {"type": "CLOUDHUB"},
                "artifact": {"name": "billing-api"},
                "lastReportedStatus": "UNDEPLOYED",
                "details": {}
            },
            {
                "id": "rtf-1",
                "target": {"type": "MC", "subtype": "runtime-fabric", "id": "cluster-9"},
                "artifact": {"name": "inventory-api"},
                "application": {"status": "RUNNING"}
            },
            {
                "id": "rtf-2",
                "target": {"type": "MC", "subtype": "runtime-fabric", "id": "cluster-9"},
                "artifact": {"name": "legacy-api"},
                "application": {"status": "NOT_RUNNING"}
            },
            {
                "id": "hy-1",
                "target": {"type": "MC", "subtype": "hybrid"},
                "artifact": {"name": "onprem-api"}
            }
        ],
        "total": 5
    }"#;

    fn apps() -> Vec<AppHandle> {
        let response: AppsResponse = serde_json::from_str(APPS_JSON).unwrap();
        response.data.into_iter().map(AppHandle::from).collect()
    }

    fn running() -> AppFilter {
        AppFilter::Running(DirectoryConfig::default())
    }

    #[test]
    fn test_conversion_classifies_targets() {
        let apps = apps();
        assert_eq!(
            apps[0].target,
            DeploymentTarget::CloudHub { domain: "orders-api-prod".into() }
        );
        assert_eq!(
            apps[1].target,
            DeploymentTarget::CloudHub { domain: "billing-api".into() }
        );
        assert_eq!(
            apps[2].target,
            DeploymentTarget::RuntimeFabric {
                cluster_id: "cluster-9".into(),
                artifact_name: "inventory-api".into()
            }
        );
        assert_eq!(apps[4].target, DeploymentTarget::Other { label: "hybrid".into() });
        assert_eq!(apps[2].status.as_deref(), Some("RUNNING"));
    }

    #[test]
    fn test_running_filter() {
        let ids: Vec<_> = filter_apps(apps(), &[running()])
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["ch-1", "rtf-1", "hy-1"]);
    }

    #[test]
    fn test_running_status_is_configurable() {
        let statuses = DirectoryConfig {
            cloudhub_running_status: "UNDEPLOYED".into(),
            ..DirectoryConfig::default()
        };
        let ids: Vec<_> = filter_apps(apps(), &[AppFilter::Running(statuses), AppFilter::CloudHub])
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["ch-2"]);
    }

    #[test]
    fn test_kind_filters_compose() {
        let rtf: Vec<_> = filter_apps(apps(), &[running(), AppFilter::RuntimeFabric])
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(rtf, vec!["rtf-1"]);

        let supported = filter_apps(apps(), &[AppFilter::CloudHubOrRuntimeFabric]);
        assert_eq!(supported.len(), 4);

        let named = filter_apps(apps(), &[AppFilter::Named("legacy-api".into())]);
        assert_eq!(named[0].id, "rtf-2");
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        assert_eq!(filter_apps(apps(), &[]).len(), 5);
    }

    #[test]
    fn test_predicates_are_pure() {
        let filters = [running(), AppFilter::CloudHub, AppFilter::RuntimeFabric];
        for app in apps() {
            for filter in &filters {
                assert_eq!(filter.matches(&app), filter.matches(&app));
            }
        }
    }
}
