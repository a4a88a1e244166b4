use async_trait::async_trait;
use muletrack_types::{MuletrackError, MuletrackResult, Scope};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::MONITORING_DATABASE;
use crate::http_client::{decode_json, read_success_body, PlatformHttpClient};

/// One row of a time series: epoch milliseconds plus the remaining columns.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    pub timestamp_ms: i64,
    pub values: Vec<Option<f64>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeries {
    pub name: String,
    pub columns: Vec<String>,
    pub points: Vec<DataPoint>,
}

/// Time-series query oracle. Implementations return the series of the first
/// statement in the response, in the order the backend produced them.
#[async_trait]
pub trait MetricsBackend: Send + Sync {
    async fn query(&self, scope: &Scope, query: &str) -> MuletrackResult<Vec<TimeSeries>>;
}

#[derive(Debug, Deserialize)]
struct InfluxResponse {
    #[serde(default)]
    results: Vec<InfluxStatement>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxStatement {
    #[serde(default)]
    statement_id: i64,
    #[serde(default)]
    series: Vec<InfluxSeries>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxSeries {
    #[serde(default)]
    name: String,
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Parses an InfluxDB 1.x query response body.
pub fn parse_response(body: &str) -> MuletrackResult<Vec<TimeSeries>> {
    let response: InfluxResponse = decode_json(body)?;

    if let Some(error) = response.error {
        return Err(MuletrackError::Api(format!("query rejected: {}", error)));
    }

    let Some(statement) = response.results.into_iter().next() else {
        return Ok(Vec::new());
    };

    if let Some(error) = statement.error {
        return Err(MuletrackError::Api(format!(
            "statement {} failed: {}",
            statement.statement_id, error
        )));
    }

    statement.series.into_iter().map(convert_series).collect()
}

fn convert_series(series: InfluxSeries) -> MuletrackResult<TimeSeries> {
    let points = series
        .values
        .into_iter()
        .map(|row| convert_row(&series.name, row))
        .collect::<MuletrackResult<Vec<_>>>()?;

    Ok(TimeSeries {
        name: series.name,
        columns: series.columns,
        points,
    })
}

fn convert_row(series: &str, row: Vec<Value>) -> MuletrackResult<DataPoint> {
    let mut cells = row.into_iter();
    let timestamp_ms = cells
        .next()
        .as_ref()
        .and_then(as_epoch_millis)
        .ok_or_else(|| {
            MuletrackError::Decode(format!("series '{}' has a row without an epoch timestamp", series))
        })?;

    let values = cells
        .map(|cell| match cell {
            Value::Null => Ok(None),
            Value::Number(n) => Ok(n.as_f64()),
            other => Err(MuletrackError::Decode(format!(
                "series '{}' has non-numeric value {}",
                series, other
            ))),
        })
        .collect::<MuletrackResult<Vec<_>>>()?;

    Ok(DataPoint {
        timestamp_ms,
        values,
    })
}

fn as_epoch_millis(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

/// Metrics backend that proxies InfluxQL through the monitoring visualizer.
pub struct InfluxMetrics {
    http: PlatformHttpClient,
    token: String,
    datasource_id: u64,
}

impl InfluxMetrics {
    pub fn new(http: PlatformHttpClient, token: impl Into<String>, datasource_id: u64) -> Self {
        Self {
            http,
            token: token.into(),
            datasource_id,
        }
    }

    fn query_path(&self) -> String {
        format!(
            "/monitoring/api/visualizer/api/datasources/proxy/{}/query",
            self.datasource_id
        )
    }
}

#[async_trait]
impl MetricsBackend for InfluxMetrics {
    async fn query(&self, scope: &Scope, query: &str) -> MuletrackResult<Vec<TimeSeries>> {
        debug!("Metrics query for {}", scope);
        trace!("InfluxQL: {}", query);

        let response = self
            .http
            .get(&self.query_path())
            .query(&[("db", MONITORING_DATABASE), ("q", query), ("epoch", "ms")])
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| MuletrackError::Network(format!("error sending request: {}", e)))?;

        let body = read_success_body(response).await?;
        parse_response(&body)
    }
}
