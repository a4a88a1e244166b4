use muletrack_types::{DeploymentTarget, LookbackWindow, Scope};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricKind {
    LastCalled,
    RequestCount,
}

impl MetricKind {
    fn select_clause(&self) -> &'static str {
        match self {
            MetricKind::LastCalled => "percentile(\"avg_response_time\", 75)",
            MetricKind::RequestCount => "sum(\"count\")",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::LastCalled => write!(f, "last-called"),
            MetricKind::RequestCount => write!(f, "request-count"),
        }
    }
}

/// A single metrics query for one application, window and metric kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySpec {
    scope: Scope,
    key: QueryKey,
    window: LookbackWindow,
    kind: MetricKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum QueryKey {
    Domain(String),
    Fabric { cluster_id: String, artifact_name: String },
}

impl QuerySpec {
    /// Returns `None` for deployment kinds the metrics backend cannot key.
    pub fn build(
        scope: &Scope,
        target: &DeploymentTarget,
        window: &LookbackWindow,
        kind: MetricKind,
    ) -> Option<Self> {
        let key = match target {
            DeploymentTarget::CloudHub { domain } => QueryKey::Domain(domain.clone()),
            DeploymentTarget::RuntimeFabric {
                cluster_id,
                artifact_name,
            } => QueryKey::Fabric {
                cluster_id: cluster_id.clone(),
                artifact_name: artifact_name.clone(),
            },
            DeploymentTarget::Other { .. } => return None,
        };

        Some(Self {
            scope: scope.clone(),
            key,
            window: window.clone(),
            kind,
        })
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn to_influxql(&self) -> String {
        let key = match &self.key {
            QueryKey::Domain(domain) => format!("\"app_id\" = '{}'", escape(domain)),
            QueryKey::Fabric {
                cluster_id,
                artifact_name,
            } => format!(
                "\"cluster_id\" = '{}' AND \"app_id\" = '{}'",
                escape(cluster_id),
                escape(artifact_name)
            ),
        };

        format!(
            "SELECT {select} FROM \"app_inbound_metric\" WHERE {key} AND \"org_id\" = '{org}' AND \"env_id\" = '{env}' AND time >= now() - {window} GROUP BY time(1m) fill(none) tz('UTC')",
            select = self.kind.select_clause(),
            key = key,
            org = escape(&self.scope.org_id),
            env = escape(&self.scope.env_id),
            window = self.window,
        )
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
