use muletrack_types::{ControlPlane, LookbackWindow, MuletrackError, MuletrackResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::constants::{CONFIG_FILE_NAME, DATA_DIR_NAME};
use super::directory::DirectoryConfig;
use super::http::HttpConfig;
use super::logging::LoggingConfig;
use super::monitor::MonitorConfig;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MuletrackConfig {
    pub control_plane: ControlPlane,
    pub http: HttpConfig,
    pub monitor: MonitorConfig,
    pub directory: DirectoryConfig,
    pub logging: LoggingConfig,
}

impl MuletrackConfig {
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(DATA_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
    }

    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    pub fn load(path: impl AsRef<Path>) -> MuletrackResult<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| MuletrackError::Config(format!("Failed to read config: {}", e)))?;

            toml::from_str(&contents)
                .map_err(|e| MuletrackError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            debug!("Config file {:?} not found, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> MuletrackResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| MuletrackError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MuletrackError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path.as_ref(), contents)
            .map_err(|e| MuletrackError::Config(format!("Failed to write config: {}", e)))?;

        info!("Configuration saved to {:?}", path.as_ref());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(plane) = std::env::var("MULETRACK_CONTROL_PLANE") {
            match plane.parse() {
                Ok(p) => self.control_plane = p,
                Err(e) => warn!("Ignoring MULETRACK_CONTROL_PLANE: {}", e),
            }
        }

        if let Ok(timeout) = std::env::var("MULETRACK_HTTP_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.http.timeout_secs = t;
            }
        }

        if let Ok(level) = std::env::var("MULETRACK_LOG_LEVEL") {
            match level.parse() {
                Ok(l) => self.logging.level = l,
                Err(e) => warn!("Ignoring MULETRACK_LOG_LEVEL: {}", e),
            }
        }
    }

    pub fn validate(&self) -> MuletrackResult<()> {
        if self.http.timeout_secs == 0 {
            return Err(MuletrackError::Config("HTTP timeout cannot be 0".into()));
        }

        if let Some(ref base) = self.http.base_url {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err(MuletrackError::Config(format!(
                    "http.base_url must be an http(s) URL, got '{}'",
                    base
                )));
            }
        }

        if self.directory.cloudhub_running_status.trim().is_empty()
            || self.directory.rtf_running_status.trim().is_empty()
        {
            return Err(MuletrackError::Config(
                "Running status strings cannot be empty".into(),
            ));
        }

        LookbackWindow::parse(&self.monitor.last_called_window)
            .map_err(|e| MuletrackError::Config(format!("monitor.last_called_window: {}", e)))?;
        LookbackWindow::parse(&self.monitor.request_count_window)
            .map_err(|e| MuletrackError::Config(format!("monitor.request_count_window: {}", e)))?;

        Ok(())
    }
}
