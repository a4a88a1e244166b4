mod commands;
mod config_cmd;
mod connect;
mod environment;
mod exchange;
mod info;
mod monitor;
mod status;
mod utils;

pub use commands::{Cli, Commands, ExchangeAction};
pub use config_cmd::handle_config;
pub use connect::run_connect;
pub use environment::run_environment;
pub use exchange::run_exchange_list;
pub use info::show_version;
pub use monitor::{run_monitor, MonitorArgs};
pub use status::show_status;
pub use utils::{init_logging, Paths, RED, RESET};
