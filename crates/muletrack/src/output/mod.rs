//! Rendering of monitor results and Exchange rows for the terminal and files.

mod csv_export;
mod detail;
mod table;

pub use csv_export::{export_csv, write_csv, CSV_HEADER};
pub use detail::render_detail;
pub use table::{client_apps_table, results_table, Table};

use chrono::{DateTime, Utc};
use muletrack_types::{MuletrackError, MuletrackResult, NO_DATA};
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// Human readable last-called cell. `None` renders as the "No data" sentinel.
pub fn format_timestamp(ts: Option<&DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
        None => NO_DATA.to_string(),
    }
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> MuletrackResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| MuletrackError::Internal(format!("Failed to encode JSON: {}", e)))
}
