//! Output formatters
//!
//! Provides trait-based output formatting for area listings.

pub mod gpx;
pub mod json;
pub mod text;

use crate::area::ProtectedArea;
use crate::error::Result;
use crate::geo::GeocodedPlace;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// A listing of areas ready for output
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaReport {
    /// Heading for the listing
    pub title: String,
    /// The town the areas were ranked against, for nearby listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub town: Option<GeocodedPlace>,
    pub areas: Vec<ProtectedArea>,
    pub generated_at: DateTime<Utc>,
}

impl AreaReport {
    /// Listing of filtered areas
    pub fn filtered(areas: Vec<ProtectedArea>) -> Self {
        Self {
            title: "IPAs matching your filters".to_string(),
            town: None,
            areas,
            generated_at: Utc::now(),
        }
    }

    /// Listing of areas nearest a town
    pub fn nearby(town: GeocodedPlace, areas: Vec<ProtectedArea>) -> Self {
        Self {
            title: format!("Nearest Indigenous Protected Areas to {}", town.display_name),
            town: Some(town),
            areas,
            generated_at: Utc::now(),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format an area listing
    fn format(&self, report: &AreaReport) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "json".to_string(),
            description: "Full JSON listing".to_string(),
        },
        FormatInfo {
            name: "text".to_string(),
            description: "Human-readable text".to_string(),
        },
        FormatInfo {
            name: "gpx".to_string(),
            description: "GPX waypoints for located areas".to_string(),
        },
    ]
}
