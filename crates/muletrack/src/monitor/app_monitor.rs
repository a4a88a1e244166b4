use chrono::{DateTime, Utc};
use muletrack_types::{
    AppHandle, LookbackWindow, MonitorFailure, MonitorResult, MuletrackError, MuletrackResult,
    Scope,
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::query::{MetricKind, QuerySpec};
use crate::platform::{MetricsBackend, TimeSeries};

/// Lookback windows used for the two signals of a monitoring run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorWindows {
    pub last_called: LookbackWindow,
    pub request_count: LookbackWindow,
}

/// Computes the last-called and request-count signals for one application.
#[derive(Clone)]
pub struct AppMonitor {
    backend: Arc<dyn MetricsBackend>,
}

impl AppMonitor {
    pub fn new(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    /// Always yields a result; backend failures end up in `failure`.
    pub async fn monitor(&self, scope: &Scope, app: &AppHandle, windows: &MonitorWindows) -> MonitorResult {
        let mut result = MonitorResult {
            app_id: app.id.clone(),
            app_type: app.type_label().to_string(),
            last_called: None,
            request_count: 0,
            last_called_window: windows.last_called.clone(),
            request_count_window: windows.request_count.clone(),
            failure: None,
        };

        let specs = (
            QuerySpec::build(scope, &app.target, &windows.last_called, MetricKind::LastCalled),
            QuerySpec::build(scope, &app.target, &windows.request_count, MetricKind::RequestCount),
        );
        let (Some(last_called_spec), Some(request_count_spec)) = specs else {
            debug!("Skipping {}: unsupported deployment target", app);
            result.failure = Some(MonitorFailure::UnsupportedType {
                kind: app.type_label().to_string(),
            });
            return result;
        };

        let (last_called, request_count) = tokio::join!(
            self.last_called(&last_called_spec),
            self.request_count(&request_count_spec),
        );

        let mut errors = (None, None);
        match last_called {
            Ok(ts) => result.last_called = ts,
            Err(e) => errors.0 = Some(e.to_string()),
        }
        match request_count {
            Ok(count) => result.request_count = count,
            Err(e) => errors.1 = Some(e.to_string()),
        }

        result.failure = MonitorFailure::from_queries(errors.0, errors.1);
        if let Some(ref failure) = result.failure {
            warn!("Monitoring {} degraded: {}", app.id, failure);
        }
        result
    }

    async fn last_called(&self, spec: &QuerySpec) -> MuletrackResult<Option<DateTime<Utc>>> {
        let series = self.backend.query(spec.scope(), &spec.to_influxql()).await?;
        last_called_from(&series)
    }

    async fn request_count(&self, spec: &QuerySpec) -> MuletrackResult<u64> {
        let series = self.backend.query(spec.scope(), &spec.to_influxql()).await?;
        Ok(request_count_from(&series))
    }
}

/// Timestamp of the final point of the first series, ignoring its values.
pub fn last_called_from(series: &[TimeSeries]) -> MuletrackResult<Option<DateTime<Utc>>> {
    let Some(last) = series.first().and_then(|s| s.points.last()) else {
        return Ok(None);
    };

    DateTime::from_timestamp_millis(last.timestamp_ms)
        .map(Some)
        .ok_or_else(|| {
            MuletrackError::Decode(format!("timestamp {} out of range", last.timestamp_ms))
        })
}

/// Sum of the first value column across the first series. Null cells count
/// as zero.
pub fn request_count_from(series: &[TimeSeries]) -> u64 {
    let total: f64 = series
        .first()
        .map(|s| {
            s.points
                .iter()
                .filter_map(|p| p.values.first().copied().flatten())
                .sum()
        })
        .unwrap_or(0.0);

    if total.is_finite() && total > 0.0 {
        total.round() as u64
    } else {
        0
    }
}
