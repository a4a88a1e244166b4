use serde::{Deserialize, Serialize};
use super::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_USER_AGENT};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Replaces the control plane host, e.g. for a corporate gateway.
    pub base_url: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: None,
        }
    }
}
