use muletrack_types::MonitorResult;

use super::format_timestamp;
use crate::monitor::ClientAppContracts;
use crate::platform::contract_summary;

const COLUMN_GAP: &str = "  ";

/// Plain left-aligned text table with a dashed rule under the header.
#[derive(Clone, Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut out = String::new();
        for line in std::iter::once(&self.headers)
            .chain(std::iter::once(&rule))
            .chain(self.rows.iter())
        {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
                .collect();
            out.push_str(cells.join(COLUMN_GAP).trim_end());
            out.push('\n');
        }
        out
    }
}

pub fn results_table(results: &[MonitorResult]) -> Table {
    let mut table = Table::new(["App ID", "Type", "Last Called", "Request Count", "Error"]);
    for result in results {
        table.push_row(vec![
            result.app_id.clone(),
            result.app_type.clone(),
            format_timestamp(result.last_called.as_ref()),
            result.request_count.to_string(),
            result
                .failure
                .as_ref()
                .map(|f| f.to_string())
                .unwrap_or_default(),
        ]);
    }
    table
}

pub fn client_apps_table(rows: &[ClientAppContracts]) -> Table {
    let mut table = Table::new(["ID", "Name", "Client ID", "Contracts"]);
    for row in rows {
        let contracts = match row.error {
            Some(ref e) => format!("error: {}", e),
            None => contract_summary(&row.contracts),
        };
        table.push_row(vec![
            row.app.id.to_string(),
            row.app.name.clone(),
            row.app.client_id.clone(),
            contracts,
        ]);
    }
    table
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

    #[test]
    fn test_columns_are_aligned() {
        let mut table = Table::new(["A", "Long header"]);
        table.push_row(vec!["wide cell".into(), "x".into()]);
        table.push_row(vec!["y".into()]);

        assert_eq!(
            table.render(),
            "A          Long header\n\
             ---------  -----------\n\
             wide cell  x\n\
             y\n"
        );
    }

    #[test]
    fn test_results_table_rows() {
        let mut failed = result("b", 0, None);
        failed.failure = Some(MonitorFailure::UnsupportedType { kind: "hybrid".into() });
        let table = results_table(&[result("a", 12, Some(1_700_000_000_000)), failed]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(table.len(), 2);
        assert!(lines[0].starts_with("App ID  Type"));
        assert!(lines[2].contains("Tue, 14 Nov 2023 22:13:20 UTC"));
        assert!(lines[2].contains("12"));
        assert!(lines[3].contains("No data"));
        assert!(lines[3].ends_with("unsupported application type"));
    }
}
