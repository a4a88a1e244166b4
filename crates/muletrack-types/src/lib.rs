#![forbid(unsafe_code)]
#![warn(clippy::all)]

mod app;
mod error;
mod platform;
mod result;
mod window;

pub use app::{AppHandle, DeploymentTarget};
pub use error::{MuletrackError, MuletrackResult};
pub use platform::{ControlPlane, Scope};
pub use result::{MonitorFailure, MonitorResult};
pub use window::LookbackWindow;

/// Placeholder shown wherever a last-called timestamp is absent.
pub const NO_DATA: &str = "No data";
