#![warn(clippy::all)]

//! Muletrack: find out which Anypoint-deployed Mule applications are still
//! being called.

pub mod config;
pub mod http_client;
pub mod monitor;
pub mod output;
pub mod platform;
pub mod session;

pub use config::MuletrackConfig;
pub use http_client::PlatformHttpClient;
pub use monitor::{AppMonitor, FanOut, MonitorWindows, ResultFilter};
pub use session::{Session, SessionStore, TokenKind};
