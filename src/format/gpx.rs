//! GPX output formatter
//!
//! Areas without coordinates have no waypoint and are skipped.

use crate::error::Result;
use crate::format::{AreaReport, OutputFormatter};

/// GPX formatter - outputs a GPX waypoint file
pub struct GpxFormatter;

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoints for located areas"
    }

    fn format(&self, report: &AreaReport) -> Result<String> {
        let mut gpx = String::new();

        // XML header
        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="ipa-explore">"#);
        gpx.push('\n');

        // Metadata
        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(&report.title)));
        gpx.push_str(&format!("    <time>{}</time>\n", report.generated_at.to_rfc3339()));
        gpx.push_str("  </metadata>\n");

        // Town waypoint
        if let Some(town) = &report.town {
            gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, town.lat, town.lng));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(&town.display_name)));
            gpx.push_str("    <sym>city</sym>\n");
            gpx.push_str("  </wpt>\n");
        }

        // Area waypoints
        for area in &report.areas {
            let Some(coords) = area.coords() else {
                continue;
            };

            gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, coords.lat, coords.lng));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(&area.name)));

            let mut desc = format!("{} · {} · {}", area.state, area.area_type, area.managing_body);
            if let Some(distance) = area.distance_km {
                desc.push_str(&format!(" · approx. {:.0} km", distance));
            }
            gpx.push_str(&format!("    <desc>{}</desc>\n", escape_xml(&desc)));
            gpx.push_str("    <sym>park</sym>\n");

            gpx.push_str("  </wpt>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::{sample_area, sample_town};

    #[test]
    fn test_gpx_format() {
        let report = AreaReport::nearby(sample_town(), vec![sample_area("Ngunya Jargoon IPA", Some(18.7))]);
        let output = GpxFormatter.format(&report).unwrap();

        assert!(output.contains(r#"<?xml version="1.0""#));
        assert!(output.contains(r#"<gpx version="1.1""#));
        assert!(output.contains(r#"<wpt lat="-28.95" lon="153.4">"#));
        assert!(output.contains("<name>Ngunya Jargoon IPA</name>"));
        assert!(output.contains("approx. 19 km"));
        assert!(output.contains("<sym>city</sym>"));
        assert!(output.ends_with("</gpx>\n"));
    }

    #[test]
    fn test_gpx_skips_unlocated_areas() {
        let mut unlocated = sample_area("Nowhere IPA", None);
        unlocated.lat = None;

        let output = GpxFormatter.format(&AreaReport::filtered(vec![unlocated])).unwrap();
        assert!(!output.contains("<wpt"));
    }

    #[test]
    fn test_gpx_escapes_names() {
        let output = GpxFormatter
            .format(&AreaReport::filtered(vec![sample_area("Land & Sea <IPA>", None)]))
            .unwrap();
        assert!(output.contains("<name>Land &amp; Sea &lt;IPA&gt;</name>"));
    }

    #[test]
    fn test_gpx_formatter_info() {
        assert_eq!(GpxFormatter.name(), "gpx");
        assert!(!GpxFormatter.description().is_empty());
    }
}
