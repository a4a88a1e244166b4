mod constants;
mod directory;
mod http;
mod logging;
mod monitor;
mod settings;
mod types;

pub use constants::*;
pub use directory::DirectoryConfig;
pub use http::HttpConfig;
pub use logging::LoggingConfig;
pub use monitor::MonitorConfig;
pub use settings::MuletrackConfig;
pub use types::LogLevel;

#[cfg(test)]
mod tests {
    use super::*;
    use muletrack_types::ControlPlane;

    #[test]
    fn test_default_config_validation() {
        let config = MuletrackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.control_plane, ControlPlane::Us);
        assert_eq!(config.monitor.last_called_window, "15m");
        assert_eq!(config.monitor.request_count_window, "24h");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = MuletrackConfig::default();
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_window_rejected() {
        let mut config = MuletrackConfig::default();
        config.monitor.request_count_window = "a day".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_running_status_rejected() {
        let mut config = MuletrackConfig::default();
        config.directory.rtf_running_status = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_must_be_http() {
        let mut config = MuletrackConfig::default();
        config.http.base_url = Some("ftp://gateway".into());
        assert!(config.validate().is_err());
        config.http.base_url = Some("https://gateway.internal".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "control_plane = \"eu\"\n[monitor]\nlast_called_window = \"1h\"\n").unwrap();

        let config = MuletrackConfig::load(&path).unwrap();
        assert_eq!(config.control_plane, ControlPlane::Eu);
        assert_eq!(config.monitor.last_called_window, "1h");
        assert_eq!(config.monitor.request_count_window, DEFAULT_REQUEST_COUNT_WINDOW);
        assert_eq!(config.directory.cloudhub_running_status, "STARTED");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MuletrackConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.http.timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_serialization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = MuletrackConfig::default();
        config.control_plane = ControlPlane::Gov;
        config.save(&path).unwrap();

        let parsed = MuletrackConfig::load(&path).unwrap();
        assert_eq!(parsed.control_plane, ControlPlane::Gov);
    }
}
