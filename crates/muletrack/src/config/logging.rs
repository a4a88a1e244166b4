use serde::{Deserialize, Serialize};
use super::types::LogLevel;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub json: bool,
}
