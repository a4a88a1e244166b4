use crate::{MuletrackError, MuletrackResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Regional Anypoint control plane a session is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ControlPlane {
    #[default]
    Us,
    Eu,
    Gov,
}

impl ControlPlane {
    pub fn host(&self) -> &'static str {
        match self {
            ControlPlane::Us => "https://anypoint.mulesoft.com",
            ControlPlane::Eu => "https://eu1.anypoint.mulesoft.com",
            ControlPlane::Gov => "https://gov.anypoint.mulesoft.com",
        }
    }

    pub fn all() -> [ControlPlane; 3] {
        [ControlPlane::Us, ControlPlane::Eu, ControlPlane::Gov]
    }
}

impl fmt::Display for ControlPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlPlane::Us => write!(f, "us"),
            ControlPlane::Eu => write!(f, "eu"),
            ControlPlane::Gov => write!(f, "gov"),
        }
    }
}

impl FromStr for ControlPlane {
    type Err = MuletrackError;

    fn from_str(s: &str) -> MuletrackResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "us" => Ok(ControlPlane::Us),
            "eu" => Ok(ControlPlane::Eu),
            "gov" => Ok(ControlPlane::Gov),
            other => Err(MuletrackError::Config(format!(
                "Invalid control plane '{}'. Valid values are 'us', 'eu' or 'gov'",
                other
            ))),
        }
    }
}

/// Organization (business group) and environment pair that narrows every
/// directory and metrics query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub org_id: String,
    pub env_id: String,
}

impl Scope {
    pub fn new(org_id: impl Into<String>, env_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            env_id: env_id.into(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "org={} env={}", self.org_id, self.env_id)
    }
}
