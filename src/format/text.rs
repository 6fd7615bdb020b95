//! Human-readable text output formatter

use crate::error::Result;
use crate::format::{AreaReport, OutputFormatter};

/// Text formatter - outputs one card per area
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &AreaReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("{} ({})\n", report.title, report.areas.len()));

        if let Some(town) = &report.town {
            output.push_str(&format!("Town: ({:.4}, {:.4})\n", town.lat, town.lng));
        }

        if report.areas.is_empty() {
            let message = match report.town {
                Some(_) => "No protected areas with known coordinates.",
                None => "No protected areas match your current filters.",
            };
            output.push_str(&format!("\n{}\n", message));
            return Ok(output);
        }

        for area in &report.areas {
            output.push_str(&format!("\n  [{}] {}\n", area.id, area.name));
            output.push_str(&format!("    {} · {}\n", area.state, area.area_type));
            output.push_str(&format!("    Managing authority type: {}\n", area.managing_body));
            if let Some(distance) = area.distance_km {
                output.push_str(&format!("    Approx. {:.0} km away\n", distance));
            }
        }

        Ok(output)
    }
}
