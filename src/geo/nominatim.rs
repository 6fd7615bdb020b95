//! Nominatim geocoding backend (OpenStreetMap)
//!
//! One request per lookup, restricted to Australia, asking for a single
//! result. No retries and no caching; the public instance allows roughly one
//! request per second and requires an identifying User-Agent.

use crate::config::Config;
use crate::constants::api::COUNTRY_CODE;
use crate::error::{Error, Result};
use crate::geo::{town_search_text, GeoBackend, GeocodedPlace};
use reqwest::header::ACCEPT_LANGUAGE;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
    accept_language: String,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimBackend {
    /// Create a backend from the `[services]` config section
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.services.user_agent)
            .timeout(Duration::from_secs(config.services.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.services.geocoder_url.trim_end_matches('/').to_string(),
            accept_language: config.services.accept_language.clone(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Parse a string-encoded coordinate
    fn parse_coord(raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok()
    }

    /// Turn the response list into a place, keeping only the first entry
    ///
    /// A first entry with unparseable or non-finite coordinates yields `None`.
    fn first_place(results: Vec<NominatimResult>) -> Option<GeocodedPlace> {
        let first = results.into_iter().next()?;
        let place = GeocodedPlace {
            lat: Self::parse_coord(&first.lat)?,
            lng: Self::parse_coord(&first.lon)?,
            display_name: first.display_name,
        };

        place.coords().is_finite().then_some(place)
    }
}

impl GeoBackend for NominatimBackend {
    async fn geocode_town(&self, query: &str, state: Option<&str>) -> Result<Option<GeocodedPlace>> {
        let Some(text) = town_search_text(query, state) else {
            return Ok(None);
        };

        let url = format!(
            "{}/search?format=json&limit=1&countrycodes={}&q={}",
            self.base_url,
            COUNTRY_CODE,
            urlencoding::encode(&text)
        );
        debug!(query = %text, "Geocoding town");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network {
                service: "Geocoder",
                status,
            });
        }

        let results: Vec<NominatimResult> = response.json().await?;
        let place = Self::first_place(results);

        match &place {
            Some(place) => info!(query = %text, found = %place.display_name, "Town geocoded"),
            None => info!(query = %text, "Town not found"),
        }

        Ok(place)
    }
}
