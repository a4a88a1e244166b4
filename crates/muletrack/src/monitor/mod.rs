//! Per-application monitoring and the batch fan-out around it.

mod app_monitor;
mod contracts;
mod filter;
mod query;
mod scheduler;


pub use app_monitor::{last_called_from, request_count_from, AppMonitor, MonitorWindows};
pub use contracts::{collect_contracts, ClientAppContracts};
pub use filter::ResultFilter;
pub use query::{MetricKind, QuerySpec};
pub use scheduler::{FanOut, FanOutOutcome, RateGate};

use muletrack_types::{AppHandle, MonitorResult, Scope};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

type MonitorJob = Pin<Box<dyn Future<Output = MonitorResult> + Send>>;

/// Monitors every application and waits for all of them.
pub async fn monitor_apps(
    fan_out: &FanOut,
    monitor: &AppMonitor,
    scope: &Scope,
    apps: Vec<AppHandle>,
    windows: &MonitorWindows,
) -> Vec<MonitorResult> {
    info!("Monitoring {} applications in {}", apps.len(), scope);
    let work = monitor_job(monitor, scope, windows);
    fan_out.run(apps, work).await
}

/// Like [`monitor_apps`], abandoning whatever is still running at `deadline`.
pub async fn monitor_apps_until(
    fan_out: &FanOut,
    monitor: &AppMonitor,
    scope: &Scope,
    apps: Vec<AppHandle>,
    windows: &MonitorWindows,
    deadline: Duration,
) -> FanOutOutcome<MonitorResult> {
    info!(
        "Monitoring {} applications in {} (deadline {:?})",
        apps.len(),
        scope,
        deadline
    );
    let work = monitor_job(monitor, scope, windows);
    fan_out.run_with_deadline(apps, work, deadline).await
}

fn monitor_job(
    monitor: &AppMonitor,
    scope: &Scope,
    windows: &MonitorWindows,
) -> impl Fn(AppHandle) -> MonitorJob + Send + Sync + 'static {
    let shared = Arc::new((monitor.clone(), scope.clone(), windows.clone()));
    move |app: AppHandle| {
        let shared = Arc::clone(&shared);
        Box::pin(async move {
            let (monitor, scope, windows) = &*shared;
            monitor.monitor(scope, &app, windows).await
        }) as MonitorJob
    }
}
