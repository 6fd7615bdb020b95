//! Geometry centroids
//!
//! The IPA service may return either GeoJSON geometries (`coordinates`) or
//! Esri polygons (`rings`). Both are nested arrays of `[x, y]` positions with
//! `x` as longitude and `y` as latitude.
//!
//! The centroid here is the unweighted mean of every vertex. It ignores
//! polygon area and the curvature of the Earth, so it is only a reasonable
//! stand-in for a location at local scale.

use crate::geo::Coordinates;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Geometry of a protected area as delivered by the feature service
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AreaGeometry {
    /// GeoJSON geometry object with a `coordinates` member
    GeoJson(Value),
    /// Esri polygon object with a `rings` member
    Esri(Value),
    /// Null, missing, or a shape with neither member
    #[default]
    Absent,
}

impl AreaGeometry {
    /// Classify a raw geometry value
    ///
    /// `coordinates` wins over `rings` when both are present and non-null.
    pub fn from_value(value: Option<Value>) -> Self {
        let Some(value) = value else {
            return Self::Absent;
        };

        let has = |key: &str| value.get(key).is_some_and(|v| !v.is_null());

        if has("coordinates") {
            Self::GeoJson(value)
        } else if has("rings") {
            Self::Esri(value)
        } else {
            Self::Absent
        }
    }

    /// The raw geometry object, if any
    pub fn raw(&self) -> Option<&Value> {
        match self {
            Self::GeoJson(value) | Self::Esri(value) => Some(value),
            Self::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Every `[lng, lat]` position in the geometry, flattened
    pub fn positions(&self) -> Vec<Coordinates> {
        let nested = match self {
            Self::GeoJson(value) => value.get("coordinates"),
            Self::Esri(value) => value.get("rings"),
            Self::Absent => None,
        };

        let mut positions = Vec::new();
        if let Some(nested) = nested {
            collect_positions(nested, &mut positions);
        }
        positions
    }
}

fn collect_positions(value: &Value, out: &mut Vec<Coordinates>) {
    let Some(items) = value.as_array() else {
        return;
    };

    let x = items.first().and_then(Value::as_f64);
    let y = items.get(1).and_then(Value::as_f64);

    if let (Some(lng), Some(lat)) = (x, y) {
        out.push(Coordinates::new(lat, lng));
    } else {
        for item in items {
            collect_positions(item, out);
        }
    }
}

impl Serialize for AreaGeometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AreaGeometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}

/// Unweighted mean of all positions in a geometry
///
/// Returns `None` when the geometry is absent or contains no positions.
pub fn centroid(geometry: &AreaGeometry) -> Option<Coordinates> {
    let positions = geometry.positions();
    if positions.is_empty() {
        return None;
    }

    let count = positions.len() as f64;
    let (sum_lat, sum_lng) = positions
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));

    Some(Coordinates::new(sum_lat / count, sum_lng / count))
}
