//! Geographic primitives and geocoding
//!
//! Provides coordinates, great-circle distance, geometry centroids and
//! town geocoding (place name to coordinates).

pub mod centroid;
pub mod distance;
pub mod nominatim;

use crate::config::Config;
use crate::constants::api::COUNTRY_NAME;
use crate::constants::search::ALL_STATES;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude) in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// A geocoded town or locality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedPlace {
    /// Display name as returned by the geocoder
    pub display_name: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

impl GeocodedPlace {
    /// Position of the place
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Resolve a town name to its best Australian match
    ///
    /// `state` biases the lookup toward one state/territory; `None` or the
    /// `ALL` sentinel searches the whole country. Returns `Ok(None)` for a
    /// blank query, an empty result list or unusable coordinates.
    fn geocode_town(
        &self,
        query: &str,
        state: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Option<GeocodedPlace>>> + Send;
}

/// Build the free-text search string sent to the geocoder
///
/// Returns `None` when the trimmed query is empty.
pub fn town_search_text(query: &str, state: Option<&str>) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }

    let text = match state {
        Some(state) if !state.is_empty() && state != ALL_STATES => {
            format!("{}, {}, {}", trimmed, state, COUNTRY_NAME)
        }
        _ => format!("{}, {}", trimmed, COUNTRY_NAME),
    };
    Some(text)
}

/// Get the geocoding backend described by the config
pub fn get_geocoder(config: &Config) -> Result<nominatim::NominatimBackend> {
    nominatim::NominatimBackend::from_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_text_without_state() {
        assert_eq!(
            town_search_text("  Ballina ", None).as_deref(),
            Some("Ballina, Australia")
        );
    }

    #[test]
    fn test_search_text_with_state() {
        assert_eq!(
            town_search_text("Ballina", Some("NSW")).as_deref(),
            Some("Ballina, NSW, Australia")
        );
    }

    #[test]
    fn test_search_text_all_sentinel_is_ignored() {
        assert_eq!(
            town_search_text("Dubbo", Some("ALL")).as_deref(),
            Some("Dubbo, Australia")
        );
    }

    #[test]
    fn test_search_text_blank() {
        assert!(town_search_text("", Some("NT")).is_none());
        assert!(town_search_text("   \t", None).is_none());
    }

    #[test]
    fn test_geocoded_place_serialization() {
        let place = GeocodedPlace {
            display_name: "Alice Springs, Northern Territory, Australia".to_string(),
            lat: -23.698,
            lng: 133.8807,
        };

        let json = serde_json::to_value(&place).unwrap();
        assert_eq!(
            json["displayName"],
            "Alice Springs, Northern Territory, Australia"
        );
        assert_eq!(place.coords(), Coordinates::new(-23.698, 133.8807));
    }
}
