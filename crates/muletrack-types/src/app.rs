use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an application runs. Each supported kind carries exactly the fields
/// its metrics query is keyed by.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeploymentTarget {
    CloudHub { domain: String },
    RuntimeFabric { cluster_id: String, artifact_name: String },
    Other { label: String },
}

impl DeploymentTarget {
    pub fn type_label(&self) -> &str {
        match self {
            DeploymentTarget::CloudHub { .. } => "CLOUDHUB",
            DeploymentTarget::RuntimeFabric { .. } => "runtime-fabric",
            DeploymentTarget::Other { label } => label,
        }
    }

    pub fn is_cloudhub(&self) -> bool {
        matches!(self, DeploymentTarget::CloudHub { .. })
    }

    pub fn is_runtime_fabric(&self) -> bool {
        matches!(self, DeploymentTarget::RuntimeFabric { .. })
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, DeploymentTarget::Other { .. })
    }
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_label())
    }
}

/// One monitorable application, as reported by the application directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppHandle {
    pub id: String,
    pub name: String,
    pub target: DeploymentTarget,
    /// Status string reported by the runtime: `lastReportedStatus` for
    /// CloudHub, `application.status` for Runtime Fabric.
    pub status: Option<String>,
}

impl AppHandle {
    pub fn type_label(&self) -> &str {
        self.target.type_label()
    }
}

impl fmt::Display for AppHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.id, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_labels() {
        let ch = DeploymentTarget::CloudHub { domain: "orders".into() };
        let rtf = DeploymentTarget::RuntimeFabric {
            cluster_id: "c-1".into(),
            artifact_name: "orders".into(),
        };
        let hybrid = DeploymentTarget::Other { label: "SERVER".into() };

        assert_eq!(ch.type_label(), "CLOUDHUB");
        assert_eq!(rtf.type_label(), "runtime-fabric");
        assert_eq!(hybrid.type_label(), "SERVER");

        assert!(ch.is_supported() && rtf.is_supported());
        assert!(!hybrid.is_supported());
    }

    #[test]
    fn test_target_serializes_tagged() {
        let ch = DeploymentTarget::CloudHub { domain: "orders".into() };
        let json = serde_json::to_value(&ch).unwrap();
        assert_eq!(json["kind"], "cloud_hub");
        assert_eq!(json["domain"], "orders");
    }

    #[test]
    fn test_unsupported_target_keeps_its_label() {
        let hybrid = DeploymentTarget::Other { label: "SERVER".into() };
        let json = serde_json::to_value(&hybrid).unwrap();
        assert_eq!(json["kind"], "other");
        assert_eq!(json["label"], "SERVER");

        let back: DeploymentTarget = serde_json::from_value(json).unwrap();
        assert_eq!(back, hybrid);
    }
}
