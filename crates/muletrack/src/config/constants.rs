pub const DEFAULT_CONCURRENCY_LIMIT: usize = 5;
pub const DEFAULT_DISPATCH_INTERVAL_MS: u64 = 100;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("muletrack/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_LAST_CALLED_WINDOW: &str = "15m";
pub const DEFAULT_REQUEST_COUNT_WINDOW: &str = "24h";

pub const DEFAULT_CLOUDHUB_RUNNING_STATUS: &str = "STARTED";
pub const DEFAULT_RTF_RUNNING_STATUS: &str = "RUNNING";

pub const MONITORING_DATABASE: &str = "\"dias\"";
pub const EXCHANGE_PAGE_LIMIT: usize = 250;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const SESSION_FILE_NAME: &str = "session.toml";
pub const DATA_DIR_NAME: &str = ".muletrack";
