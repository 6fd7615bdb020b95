//! JSON output formatter

use crate::error::Result;
use crate::format::{AreaReport, OutputFormatter};

/// JSON formatter - outputs the full listing as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON listing"
    }

    fn format(&self, report: &AreaReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::{sample_area, sample_town};

    #[test]
    fn test_json_format() {
        let report = AreaReport::nearby(sample_town(), vec![sample_area("Ngunya Jargoon IPA", Some(18.7))]);
        let output = JsonFormatter.format(&report).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["town"]["displayName"], "Ballina, New South Wales, Australia");
        assert_eq!(parsed["areas"][0]["name"], "Ngunya Jargoon IPA");
        assert_eq!(parsed["areas"][0]["distanceKm"], 18.7);
        assert!(parsed.get("generatedAt").is_some());
    }

    #[test]
    fn test_json_filtered_has_no_town() {
        let output = JsonFormatter.format(&AreaReport::filtered(Vec::new())).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed.get("town").is_none());
        assert_eq!(parsed["areas"], serde_json::json!([]));
    }
}
