//! Great-circle distance
//!
//! Spherical haversine approximation; accurate enough for ranking nearby
//! areas but not a geodetic measurement.

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::geo::Coordinates;

/// Haversine distance between two points in kilometers
///
/// Inputs are degrees. NaN inputs produce NaN; no error is raised.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance between two coordinates in kilometers
pub fn distance_between(a: Coordinates, b: Coordinates) -> f64 {
    distance_km(a.lat, a.lng, b.lat, b.lng)
}
