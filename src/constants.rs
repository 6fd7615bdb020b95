//! Centralized constants for the ipa-explore crate
//!
//! Constants shared by several modules live here so the numbers and URLs
//! are defined exactly once.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers (spherical approximation)
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
}

/// External API endpoints
pub mod api {
    /// Australian Government Indigenous Protected Areas feature service
    pub const IPA_URL: &str = "https://gis.environment.gov.au/gispubmap/rest/services/ogc_services/Indigenous_Protected_Areas/MapServer/0/query?f=geojson&where=1=1&outFields=*";

    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Country restriction passed to the geocoder
    pub const COUNTRY_CODE: &str = "au";

    /// Country name appended to every town query
    pub const COUNTRY_NAME: &str = "Australia";
}

/// Area filtering and search
pub mod search {
    /// Sentinel state value meaning "every state/territory"
    pub const ALL_STATES: &str = "ALL";

    /// Number of nearby areas returned by a town search
    pub const NEARBY_COUNT: usize = 5;

    /// Message shown when a town cannot be geocoded
    pub const TOWN_NOT_FOUND_MESSAGE: &str = "We could not find that town in Australia. Try a nearby larger town name or check the spelling.";
}

/// Map camera framing
pub mod map {
    /// Default map centre, roughly the middle of Australia (lat, lng)
    pub const DEFAULT_CENTER: (f64, f64) = (-25.0, 133.0);

    /// Zoom when nothing is selected
    pub const DEFAULT_ZOOM: u8 = 4;

    /// Zoom when an area with coordinates is selected
    pub const SELECTED_ZOOM: u8 = 7;

    /// Zoom when framing a geocoded town
    pub const TOWN_ZOOM: u8 = 6;
}
