use crate::{MuletrackError, MuletrackResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const UNITS: [&str; 6] = ["ms", "s", "m", "h", "d", "w"];

/// Duration literal bounding how far back a metrics query looks, e.g. `15m`,
/// `24h` or `3d`.
///
/// Only the shape `<digits><unit>` is checked. The literal is spliced into
/// query text verbatim, so anything else is rejected here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LookbackWindow(String);

impl LookbackWindow {
    pub fn parse(raw: &str) -> MuletrackResult<Self> {
        let raw = raw.trim();
        let split = raw
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| MuletrackError::InvalidWindow(format!("'{}' has no unit", raw)))?;

        let (digits, unit) = raw.split_at(split);
        if digits.is_empty() {
            return Err(MuletrackError::InvalidWindow(format!(
                "'{}' must start with a number",
                raw
            )));
        }
        if !UNITS.contains(&unit) {
            return Err(MuletrackError::InvalidWindow(format!(
                "'{}' has unknown unit '{}' (expected one of {})",
                raw,
                unit,
                UNITS.join(", ")
            )));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LookbackWindow {
    type Err = MuletrackError;

    fn from_str(s: &str) -> MuletrackResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LookbackWindow {
    type Error = MuletrackError;

    fn try_from(value: String) -> MuletrackResult<Self> {
        Self::parse(&value)
    }
}

impl From<LookbackWindow> for String {
    fn from(window: LookbackWindow) -> Self {
        window.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_common_windows() {
        for raw in ["15m", "24h", "3d", "0s", "500ms", "2w"] {
            assert_eq!(LookbackWindow::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_rejects_malformed_windows() {
        for raw in ["", "m", "15", "15x", "-5m", "1.5h", "15m; DROP", "h15"] {
            assert!(LookbackWindow::parse(raw).is_err(), "{} should be rejected", raw);
        }
    }

    #[test]
    fn test_serde_goes_through_validation() {
        let ok: LookbackWindow = serde_json::from_str("\"24h\"").unwrap();
        assert_eq!(ok.as_str(), "24h");
        assert!(serde_json::from_str::<LookbackWindow>("\"yesterday\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_digits_with_known_unit_parse(n in 0u32..1_000_000, unit in prop::sample::select(UNITS.to_vec())) {
            let raw = format!("{}{}", n, unit);
            prop_assert_eq!(LookbackWindow::parse(&raw).unwrap().to_string(), raw);
        }
    }
}
