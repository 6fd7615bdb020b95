//! ipa-explore: Indigenous Protected Areas explorer
//!
//! A library and CLI tool for browsing Australia's Indigenous Protected
//! Areas: filter them by name and state, find the ones nearest a town, and
//! drive a map view with selection and hover.
//!
//! ## Features
//!
//! - Fetches and normalises the IPA feature service dataset
//! - Case-insensitive name filter with exact state/territory match
//! - Town geocoding through Nominatim, with nearest-K by haversine distance
//! - Shared selection state with camera framing and marker emphasis
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use ipa_explore::area::{nearby::nearest, Dataset, ProtectedArea};
//! use ipa_explore::geo::GeocodedPlace;
//!
//! let dataset = Dataset::from_areas(vec![ProtectedArea {
//!     id: 0,
//!     feature_id: None,
//!     name: "Ngunya Jargoon IPA".to_string(),
//!     state: "NSW".to_string(),
//!     area_type: "Dedicated".to_string(),
//!     managing_body: "Unknown".to_string(),
//!     lat: Some(-28.95),
//!     lng: Some(153.4),
//!     distance_km: None,
//! }]);
//!
//! let ballina = GeocodedPlace {
//!     display_name: "Ballina".to_string(),
//!     lat: -28.8667,
//!     lng: 153.5667,
//! };
//!
//! let closest = nearest(&ballina, dataset.areas(), 5);
//! println!("{} is {:.0} km away", closest[0].name, closest[0].distance_km.unwrap());
//! ```

pub mod area;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod explorer;
pub mod format;
pub mod geo;
pub mod selection;
pub mod server;

// Re-export commonly used types
pub use area::{AreaId, Dataset, ProtectedArea};
pub use config::Config;
pub use error::{Error, Result};
pub use explorer::{Explorer, ExplorerView};
pub use geo::{Coordinates, GeocodedPlace};
