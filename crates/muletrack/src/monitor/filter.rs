use clap::ValueEnum;
use muletrack_types::MonitorResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects results by whether they carry traffic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResultFilter {
    #[default]
    All,
    Nonempty,
    Empty,
}

impl ResultFilter {
    pub fn keep(&self, has_data: bool) -> bool {
        match self {
            ResultFilter::All => true,
            ResultFilter::Nonempty => has_data,
            ResultFilter::Empty => !has_data,
        }
    }

    pub fn apply_by<T>(&self, items: Vec<T>, has_data: impl Fn(&T) -> bool) -> Vec<T> {
        items.into_iter().filter(|item| self.keep(has_data(item))).collect()
    }

    pub fn apply(&self, results: Vec<MonitorResult>) -> Vec<MonitorResult> {
        self.apply_by(results, MonitorResult::has_traffic)
    }
}

impl fmt::Display for ResultFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultFilter::All => write!(f, "all"),
            ResultFilter::Nonempty => write!(f, "nonempty"),
            ResultFilter::Empty => write!(f, "empty"),
        }
    }
}
