//! Protected areas
//!
//! This module handles:
//! - Normalising raw IPA features into [`ProtectedArea`] records
//! - Holding the loaded dataset for a session
//! - Filtering by name and state/territory
//! - Ranking areas by distance from a town

pub mod filter;
pub mod nearby;
pub mod source;

use crate::geo::centroid::{centroid, AreaGeometry};
use crate::geo::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use source::{IpaFeature, IpaFeatureCollection};
use std::collections::BTreeSet;

/// Positional index of an area within the loaded feature collection
///
/// Only meaningful for the dataset it came from: a reload may reorder
/// features upstream.
pub type AreaId = usize;

const UNNAMED_AREA: &str = "Unnamed Area";
const UNKNOWN_STATE: &str = "Unknown";
const UNKNOWN_TYPE: &str = "Unknown Type";
const UNKNOWN_AUTHORITY: &str = "Unknown";

/// Human-readable labels for AUTHORITY codes
const AUTHORITY_LABELS: &[(&str, &str)] = &[
    ("IMG", "Indigenous Management Group"),
    ("LALC", "Local Aboriginal Land Council"),
    ("TSRA", "Torres Strait Regional Authority"),
];

/// A normalised Indigenous Protected Area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedArea {
    pub id: AreaId,
    /// Upstream feature identifier, when the service provides one
    pub feature_id: Option<i64>,
    pub name: String,
    pub state: String,
    #[serde(rename = "type")]
    pub area_type: String,
    pub managing_body: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Distance from the searched town; only set on nearby results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl ProtectedArea {
    /// Position of the area when both coordinates are known
    pub fn coords(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    /// Copy of this area annotated with a distance
    pub fn with_distance(&self, distance_km: f64) -> Self {
        Self {
            distance_km: Some(distance_km),
            ..self.clone()
        }
    }
}

/// Look up the label for a known authority code
pub fn authority_label(code: &str) -> Option<&'static str> {
    AUTHORITY_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
}

/// Format the managing body for an authority code
///
/// Known codes become "Label (CODE)", unknown codes are returned trimmed,
/// and an empty or missing code becomes "Unknown".
pub fn managing_body(code: Option<&str>) -> String {
    let code = code.map(str::trim).unwrap_or_default();

    match authority_label(code) {
        Some(label) => format!("{} ({})", label, code),
        None if code.is_empty() => UNKNOWN_AUTHORITY.to_string(),
        None => code.to_string(),
    }
}

/// Text for a property, falling back to a placeholder when missing or null
fn text_or(value: Option<&Value>, placeholder: &str) -> String {
    match value {
        None | Some(Value::Null) => placeholder.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Numeric property value; strings and other types are ignored
fn number(value: Option<&Value>) -> Option<f64> {
    value.filter(|v| v.is_number()).and_then(Value::as_f64)
}

/// Normalise one raw feature
///
/// With `centroid_fallback`, an area missing LATITUDE/LONGITUDE takes its
/// position from the geometry centroid instead.
pub fn normalize_feature(index: usize, feature: &IpaFeature, centroid_fallback: bool) -> ProtectedArea {
    let props = feature.properties.clone().unwrap_or_default();

    let authority = props.authority.as_ref().and_then(Value::as_str);

    let (mut lat, mut lng) = (number(props.latitude.as_ref()), number(props.longitude.as_ref()));
    if centroid_fallback && (lat.is_none() || lng.is_none()) {
        if let Some(c) = centroid(&feature.geometry) {
            lat = Some(c.lat);
            lng = Some(c.lng);
        }
    }

    let feature_id = feature
        .id
        .as_ref()
        .and_then(Value::as_i64)
        .or_else(|| props.object_id.as_ref().and_then(Value::as_i64));

    ProtectedArea {
        id: index,
        feature_id,
        name: text_or(props.name.as_ref(), UNNAMED_AREA),
        state: text_or(props.state.as_ref(), UNKNOWN_STATE),
        area_type: text_or(props.area_type.as_ref(), UNKNOWN_TYPE),
        managing_body: managing_body(authority),
        lat,
        lng,
        distance_km: None,
    }
}

/// Distinct state values present in the areas, sorted
pub fn state_options(areas: &[ProtectedArea]) -> Vec<String> {
    areas
        .iter()
        .map(|a| a.state.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The loaded national dataset, read-only for the rest of the session
#[derive(Debug, Clone)]
pub struct Dataset {
    areas: Vec<ProtectedArea>,
    geometries: Vec<AreaGeometry>,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Normalise a fetched feature collection
    pub fn from_collection(collection: IpaFeatureCollection, centroid_fallback: bool) -> Self {
        let areas = collection
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| normalize_feature(index, feature, centroid_fallback))
            .collect();

        let geometries = collection.features.into_iter().map(|f| f.geometry).collect();

        Self {
            areas,
            geometries,
            loaded_at: Utc::now(),
        }
    }

    /// Build a dataset from already normalised areas, without geometry
    ///
    /// Area ids are reassigned to match their position.
    pub fn from_areas(areas: Vec<ProtectedArea>) -> Self {
        let areas: Vec<ProtectedArea> = areas
            .into_iter()
            .enumerate()
            .map(|(id, area)| ProtectedArea { id, ..area })
            .collect();
        let geometries = vec![AreaGeometry::Absent; areas.len()];

        Self {
            areas,
            geometries,
            loaded_at: Utc::now(),
        }
    }

    pub fn areas(&self) -> &[ProtectedArea] {
        &self.areas
    }

    pub fn get(&self, id: AreaId) -> Option<&ProtectedArea> {
        self.areas.get(id)
    }

    /// Raw geometry of an area, if the service sent one
    pub fn geometry(&self, id: AreaId) -> Option<&AreaGeometry> {
        self.geometries.get(id).filter(|g| !g.is_absent())
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Number of areas with both coordinates
    pub fn located_count(&self) -> usize {
        self.areas.iter().filter(|a| a.coords().is_some()).count()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(value: Value) -> IpaFeature {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_managing_body_known_code() {
        assert_eq!(managing_body(Some("LALC")), "Local Aboriginal Land Council (LALC)");
        assert_eq!(managing_body(Some(" TSRA ")), "Torres Strait Regional Authority (TSRA)");
    }

    #[test]
    fn test_managing_body_unknown_code() {
        assert_eq!(managing_body(Some("XYZ")), "XYZ");
        assert_eq!(managing_body(Some("  XYZ  ")), "XYZ");
    }

    #[test]
    fn test_managing_body_missing_code() {
        assert_eq!(managing_body(None), "Unknown");
        assert_eq!(managing_body(Some("")), "Unknown");
        assert_eq!(managing_body(Some("   ")), "Unknown");
    }

    #[test]
    fn test_normalize_full_feature() {
        let f = feature(json!({
            "id": 42,
            "properties": {
                "NAME": "Ngunya Jargoon IPA",
                "STATE": "NSW",
                "TYPE": "Dedicated",
                "AUTHORITY": "LALC",
                "LATITUDE": -28.95,
                "LONGITUDE": 153.4
            },
            "geometry": null
        }));

        let area = normalize_feature(3, &f, false);
        assert_eq!(area.id, 3);
        assert_eq!(area.feature_id, Some(42));
        assert_eq!(area.name, "Ngunya Jargoon IPA");
        assert_eq!(area.state, "NSW");
        assert_eq!(area.area_type, "Dedicated");
        assert_eq!(area.managing_body, "Local Aboriginal Land Council (LALC)");
        assert_eq!(area.coords(), Some(Coordinates::new(-28.95, 153.4)));
        assert_eq!(area.distance_km, None);
    }

    #[test]
    fn test_normalize_placeholders() {
        let f = feature(json!({ "properties": { "NAME": null }, "geometry": null }));

        let area = normalize_feature(0, &f, false);
        assert_eq!(area.name, "Unnamed Area");
        assert_eq!(area.state, "Unknown");
        assert_eq!(area.area_type, "Unknown Type");
        assert_eq!(area.managing_body, "Unknown");
        assert_eq!(area.lat, None);
        assert_eq!(area.lng, None);
        assert_eq!(area.feature_id, None);
    }

    #[test]
    fn test_normalize_missing_properties() {
        let area = normalize_feature(7, &feature(json!({ "geometry": null })), false);
        assert_eq!(area.id, 7);
        assert_eq!(area.name, "Unnamed Area");
    }

    #[test]
    fn test_string_coordinates_are_ignored() {
        let f = feature(json!({
            "properties": { "LATITUDE": "-12.5", "LONGITUDE": 130.8, "OBJECTID": 9 }
        }));

        let area = normalize_feature(0, &f, false);
        assert_eq!(area.lat, None);
        assert_eq!(area.lng, Some(130.8));
        assert_eq!(area.coords(), None);
        assert_eq!(area.feature_id, Some(9));
    }

    #[test]
    fn test_non_string_authority_is_unknown() {
        let f = feature(json!({ "properties": { "AUTHORITY": 17 } }));
        assert_eq!(normalize_feature(0, &f, false).managing_body, "Unknown");
    }

    #[test]
    fn test_centroid_fallback() {
        let f = feature(json!({
            "properties": { "NAME": "Polygon only" },
            "geometry": { "type": "Polygon", "coordinates": [[[130.0, -12.0], [132.0, -14.0]]] }
        }));

        assert_eq!(normalize_feature(0, &f, false).coords(), None);

        let area = normalize_feature(0, &f, true);
        assert_eq!(area.coords(), Some(Coordinates::new(-13.0, 131.0)));
    }

    #[test]
    fn test_centroid_fallback_keeps_source_coordinates() {
        let f = feature(json!({
            "properties": { "LATITUDE": -1.0, "LONGITUDE": 1.0 },
            "geometry": { "type": "Point", "coordinates": [50.0, 50.0] }
        }));

        assert_eq!(
            normalize_feature(0, &f, true).coords(),
            Some(Coordinates::new(-1.0, 1.0))
        );
    }

    #[test]
    fn test_dataset_from_collection() {
        let collection: IpaFeatureCollection = serde_json::from_value(json!({
            "features": [
                { "properties": { "NAME": "A", "STATE": "NT", "LATITUDE": -12.0, "LONGITUDE": 131.0 },
                  "geometry": { "type": "Point", "coordinates": [131.0, -12.0] } },
                { "properties": { "NAME": "B", "STATE": "WA" }, "geometry": null }
            ]
        }))
        .unwrap();

        let dataset = Dataset::from_collection(collection, false);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.located_count(), 1);
        assert_eq!(dataset.get(1).unwrap().name, "B");
        assert!(dataset.geometry(0).is_some());
        assert!(dataset.geometry(1).is_none());
        assert!(dataset.get(2).is_none());
    }

    #[test]
    fn test_dataset_from_areas_reassigns_ids() {
        let area = normalize_feature(99, &IpaFeature::default(), false);
        let dataset = Dataset::from_areas(vec![area.clone(), area]);
        let ids: Vec<AreaId> = dataset.areas().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_state_options_sorted_unique() {
        let make = |state: &str| ProtectedArea {
            state: state.to_string(),
            ..normalize_feature(0, &IpaFeature::default(), false)
        };
        let areas = vec![make("WA"), make("NSW"), make("WA"), make("NT")];
        assert_eq!(state_options(&areas), vec!["NSW", "NT", "WA"]);
    }

    #[test]
    fn test_serialization_shape() {
        let area = ProtectedArea {
            id: 0,
            feature_id: None,
            name: "A".to_string(),
            state: "SA".to_string(),
            area_type: "Dedicated".to_string(),
            managing_body: "Unknown".to_string(),
            lat: None,
            lng: None,
            distance_km: None,
        };

        let json = serde_json::to_value(&area).unwrap();
        assert_eq!(json["type"], "Dedicated");
        assert_eq!(json["managingBody"], "Unknown");
        assert!(json["lat"].is_null());
        assert!(json.get("distanceKm").is_none());

        let json = serde_json::to_value(area.with_distance(12.5)).unwrap();
        assert_eq!(json["distanceKm"], 12.5);
    }
}
