use muletrack_types::{MonitorResult, MuletrackError, MuletrackResult};
use std::io::Write;
use std::path::Path;
use tracing::info;

use super::format_timestamp;

pub const CSV_HEADER: [&str; 7] = [
    "App ID",
    "Type",
    "Last Called",
    "Request Count",
    "LC Window",
    "RC Window",
    "Error",
];

/// Writes one header row plus one row per result. A missing timestamp is
/// written as "No data", never left blank.
pub fn write_csv<W: Write>(writer: W, results: &[MonitorResult]) -> MuletrackResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(CSV_HEADER)
        .map_err(|e| MuletrackError::Export(format!("error writing header to CSV: {}", e)))?;

    for result in results {
        let record = [
            result.app_id.clone(),
            result.app_type.clone(),
            format_timestamp(result.last_called.as_ref()),
            result.request_count.to_string(),
            result.last_called_window.to_string(),
            result.request_count_window.to_string(),
            result
                .failure
                .as_ref()
                .map(|f| f.to_string())
                .unwrap_or_default(),
        ];
        csv.write_record(&record).map_err(|e| {
            MuletrackError::Export(format!("error writing record for app {}: {}", result.app_id, e))
        })?;
    }

    csv.flush()
        .map_err(|e| MuletrackError::Export(format!("error flushing CSV: {}", e)))
}

/// Creates or truncates `path` and writes the results to it.
pub fn export_csv(path: impl AsRef<Path>, results: &[MonitorResult]) -> MuletrackResult<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .map_err(|e| MuletrackError::Export(format!("failed to create file {:?}: {}", path, e)))?;
    write_csv(file, results)?;
    info!("Exported {} rows to {:?}", results.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use muletrack_types::{LookbackWindow, MonitorFailure};

    fn result(id: &str, count: u64, last_called_ms: Option<i64>) -> MonitorResult {
        MonitorResult {
            app_id: id.into(),
            app_type: "CLOUDHUB".into(),
            last_called: last_called_ms.and_then(DateTime::from_timestamp_millis),
            request_count: count,
            last_called_window: LookbackWindow::parse("15m").unwrap(),
            request_count_window: LookbackWindow::parse("24h").unwrap(),
            failure: None,
        }
    }

    fn rows(results: &[MonitorResult]) -> Vec<Vec<String>> {
        let mut buf = Vec::new();
        write_csv(&mut buf, results).unwrap();
        let mut reader = csv::Reader::from_reader(buf.as_slice());
        reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect()
    }

    #[test]
    fn test_zero_count_and_no_timestamp() {
        let rows = rows(&[result("idle", 0, None)]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][2], "No data");
        assert_eq!(rows[0][3], "0");
        assert_eq!(rows[0][4], "15m");
        assert_eq!(rows[0][5], "24h");
        assert_eq!(rows[0][6], "");
    }

    #[test]
    fn test_failure_text_is_quoted_field() {
        let mut failed = result("broken", 3, Some(1_700_000_000_000));
        failed.failure = MonitorFailure::from_queries(Some("timeout, retry later".into()), None);

        let rows = rows(&[failed]);
        assert_eq!(rows[0][2], "Tue, 14 Nov 2023 22:13:20 UTC");
        assert_eq!(rows[0][3], "3");
        assert_eq!(
            rows[0][6],
            "lastCalled error: timeout, retry later, requestCount error: <none>"
        );
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        export_csv(&path, &[result("a", 1, None), result("b", 2, None)]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("App ID,Type,Last Called,Request Count,LC Window,RC Window,Error")
        );
        assert_eq!(lines.count(), 2);
    }
}
