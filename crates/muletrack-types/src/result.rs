use crate::LookbackWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a monitor row is incomplete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MonitorFailure {
    UnsupportedType { kind: String },
    /// At least one metric query failed. Both slots are kept so the reader can
    /// tell which signal degraded.
    Query {
        last_called: Option<String>,
        request_count: Option<String>,
    },
}

impl MonitorFailure {
    pub fn from_queries(last_called: Option<String>, request_count: Option<String>) -> Option<Self> {
        if last_called.is_none() && request_count.is_none() {
            None
        } else {
            Some(MonitorFailure::Query {
                last_called,
                request_count,
            })
        }
    }
}

impl fmt::Display for MonitorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorFailure::UnsupportedType { .. } => write!(f, "unsupported application type"),
            MonitorFailure::Query {
                last_called,
                request_count,
            } => write!(
                f,
                "lastCalled error: {}, requestCount error: {}",
                last_called.as_deref().unwrap_or("<none>"),
                request_count.as_deref().unwrap_or("<none>")
            ),
        }
    }
}

/// One row per application attempted by a monitoring run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorResult {
    pub app_id: String,
    pub app_type: String,
    /// Timestamp of the most recent inbound data point. `None` means the
    /// series was empty, which is a valid outcome.
    pub last_called: Option<DateTime<Utc>>,
    pub request_count: u64,
    pub last_called_window: LookbackWindow,
    pub request_count_window: LookbackWindow,
    pub failure: Option<MonitorFailure>,
}

impl MonitorResult {
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn has_traffic(&self) -> bool {
        self.request_count > 0
    }
}
