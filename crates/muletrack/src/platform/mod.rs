//! Typed clients for the Anypoint platform endpoints the monitor consumes.

pub mod auth;
pub mod directory;
pub mod exchange;
pub mod metrics;
pub mod organizations;

pub use directory::{filter_apps, AppDirectory, AppFilter, ArmDirectory};
pub use exchange::{contract_summary, ClientApp, Contract, ExchangeApi, ExchangeClient};
pub use metrics::{DataPoint, InfluxMetrics, MetricsBackend, TimeSeries};
pub use organizations::{BusinessGroup, Environment, OrganizationClient};
