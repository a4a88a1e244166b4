use super::commands::{AppTypeFilter, OutputFormat};
use super::utils::{print_json, CYAN, GREY, RED, RESET, YELLOW};
use anyhow::{bail, Context, Result};
use muletrack::monitor::{monitor_apps, monitor_apps_until};
use muletrack::output::{export_csv, render_detail, results_table};
use muletrack::platform::{AppDirectory, AppFilter, ArmDirectory, InfluxMetrics};
use muletrack::{
    AppMonitor, FanOut, MonitorWindows, MuletrackConfig, PlatformHttpClient, ResultFilter,
    Session, SessionStore,
};
use muletrack_types::{AppHandle, LookbackWindow, MonitorResult, MuletrackError, Scope};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct MonitorArgs {
    pub org: Option<String>,
    pub env: Option<String>,
    pub app: Option<String>,
    pub last_called_window: Option<String>,
    pub request_count_window: Option<String>,
    pub filter: ResultFilter,
    pub app_type: AppTypeFilter,
    pub csv: Option<PathBuf>,
    pub deadline: Option<u64>,
}

/// Flags win over the session's selected scope, one id at a time.
fn resolve_scope(args: &MonitorArgs, session: &Session) -> Result<Scope> {
    let selected = session.scope();
    let org = args
        .org
        .clone()
        .or_else(|| selected.as_ref().map(|s| s.org_id.clone()));
    let env = args
        .env
        .clone()
        .or_else(|| selected.as_ref().map(|s| s.env_id.clone()));
    let (Some(org), Some(env)) = (org, env) else {
        bail!("Please provide --org and --env, or select them with 'muletrack environment'");
    };
    Ok(Scope::new(org, env))
}

fn resolve_windows(config: &MuletrackConfig, args: &MonitorArgs) -> Result<MonitorWindows> {
    let last_called = match args.last_called_window {
        Some(ref raw) => LookbackWindow::parse(raw).context("--last-called-window")?,
        None => config.monitor.last_called_window()?,
    };
    let request_count = match args.request_count_window {
        Some(ref raw) => LookbackWindow::parse(raw).context("--request-count-window")?,
        None => config.monitor.request_count_window()?,
    };
    Ok(MonitorWindows {
        last_called,
        request_count,
    })
}

fn type_filters(config: &MuletrackConfig, app_type: AppTypeFilter) -> Vec<AppFilter> {
    let mut filters = vec![AppFilter::Running(config.directory.clone())];
    match app_type {
        AppTypeFilter::All => {}
        AppTypeFilter::Cloudhub => filters.push(AppFilter::CloudHub),
        AppTypeFilter::Rtf => filters.push(AppFilter::RuntimeFabric),
    }
    filters
}

pub async fn run_monitor(
    config: &MuletrackConfig,
    store: &SessionStore,
    args: MonitorArgs,
    format: OutputFormat,
) -> Result<()> {
    let session = store.require_usable()?;
    let scope = resolve_scope(&args, &session)?;
    let windows = resolve_windows(config, &args)?;

    let http = PlatformHttpClient::new(session.control_plane, &config.http)?;
    let directory = ArmDirectory::new(http.clone(), session.token());
    let metrics = InfluxMetrics::new(http, session.token(), session.datasource_id);
    let monitor = AppMonitor::new(Arc::new(metrics));

    if let Some(ref app_id) = args.app {
        let result = monitor_single(&directory, &monitor, &scope, app_id, &windows).await?;
        return report_single(&result, args.csv.as_deref(), format);
    }

    let apps = directory
        .list_applications(&scope, &type_filters(config, args.app_type))
        .await
        .with_context(|| format!("Error retrieving apps for {}", scope))?;

    if apps.is_empty() {
        if format == OutputFormat::Text {
            println!("No apps found for the given org and env.");
        } else {
            print_json::<[MonitorResult]>(&[])?;
        }
        return Ok(());
    }

    let total = apps.len();
    let fan_out = FanOut::default();
    let results = match args.deadline {
        Some(secs) => {
            let outcome =
                monitor_apps_until(&fan_out, &monitor, &scope, apps, &windows, Duration::from_secs(secs)).await;
            if !outcome.is_complete() {
                warn!(
                    "Deadline reached: {} of {} apps were abandoned",
                    outcome.abandoned, total
                );
            }
            outcome.results
        }
        None => monitor_apps(&fan_out, &monitor, &scope, apps, &windows).await,
    };
    let collected = results.len();
    let results = args.filter.apply(results);
    info!("{} of {} results kept by filter '{}'", results.len(), collected, args.filter);

    if let Some(ref path) = args.csv {
        export_csv(path, &results)?;
    }

    match format {
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Text => {
            println!();
            println!("* Using last-called window: {}{}{}", CYAN, windows.last_called, RESET);
            println!("* Using request count window: {}{}{}", CYAN, windows.request_count, RESET);
            println!("* Found {} apps to monitor.", total);
            println!("* Collected monitoring data for {} apps.", collected);
            if collected < total {
                println!(
                    "{}* {} apps did not finish before the deadline.{}",
                    YELLOW,
                    total - collected,
                    RESET
                );
            }
            println!(
                "* After applying filter '{}', {} apps remain.",
                args.filter,
                results.len()
            );
            if results.is_empty() {
                println!("No apps match the filter criteria.");
            } else {
                println!();
                print!("{}", results_table(&results).render());
            }
            if let Some(ref path) = args.csv {
                println!("{}Results written to {}{}", GREY, path.display(), RESET);
            }
        }
    }
    Ok(())
}

async fn find_app(directory: &dyn AppDirectory, scope: &Scope, app_id: &str) -> Result<AppHandle> {
    let apps = directory
        .list_applications(scope, &[])
        .await
        .with_context(|| format!("Error retrieving apps for {}", scope))?;
    let app = apps
        .into_iter()
        .find(|a| a.id == app_id)
        .ok_or_else(|| MuletrackError::NotFound(format!("application {} in {}", app_id, scope)))?;
    Ok(app)
}

/// Monitors one application directly, without the fan-out. A failed
/// measurement is part of the result, not an error.
async fn monitor_single(
    directory: &dyn AppDirectory,
    monitor: &AppMonitor,
    scope: &Scope,
    app_id: &str,
    windows: &MonitorWindows,
) -> Result<MonitorResult> {
    let app = find_app(directory, scope, app_id).await?;
    let result = monitor.monitor(scope, &app, windows).await;
    if let Some(ref failure) = result.failure {
        warn!("Monitoring {} failed: {}", app_id, failure);
    }
    Ok(result)
}

fn report_single(result: &MonitorResult, csv: Option<&Path>, format: OutputFormat) -> Result<()> {
    if let Some(path) = csv {
        export_csv(path, std::slice::from_ref(result))?;
    }

    match format {
        OutputFormat::Json => print_json(result)?,
        OutputFormat::Text => match result.failure {
            Some(ref failure) => println!(
                "{}[-]{} Error monitoring app {}: {}",
                RED, RESET, result.app_id, failure
            ),
            None => print!("{}", render_detail(result)),
        },
    }
    Ok(())
}
