use muletrack_types::LookbackWindow;
use serde::{Deserialize, Serialize};
use super::constants::{DEFAULT_LAST_CALLED_WINDOW, DEFAULT_REQUEST_COUNT_WINDOW};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub last_called_window: String,
    pub request_count_window: String,
}

impl MonitorConfig {
    pub fn last_called_window(&self) -> muletrack_types::MuletrackResult<LookbackWindow> {
        LookbackWindow::parse(&self.last_called_window)
    }

    pub fn request_count_window(&self) -> muletrack_types::MuletrackResult<LookbackWindow> {
        LookbackWindow::parse(&self.request_count_window)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            last_called_window: DEFAULT_LAST_CALLED_WINDOW.to_string(),
            request_count_window: DEFAULT_REQUEST_COUNT_WINDOW.to_string(),
        }
    }
}
