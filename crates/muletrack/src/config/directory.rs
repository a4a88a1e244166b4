use serde::{Deserialize, Serialize};
use super::constants::{DEFAULT_CLOUDHUB_RUNNING_STATUS, DEFAULT_RTF_RUNNING_STATUS};

/// Status strings that count as "running" for each deployment kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub cloudhub_running_status: String,
    pub rtf_running_status: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            cloudhub_running_status: DEFAULT_CLOUDHUB_RUNNING_STATUS.to_string(),
            rtf_running_status: DEFAULT_RTF_RUNNING_STATUS.to_string(),
        }
    }
}
