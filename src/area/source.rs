//! IPA feature service client
//!
//! Fetches the whole national dataset in one request. The service returns
//! GeoJSON with loosely typed properties; everything is kept as raw JSON
//! values here and only interpreted during normalisation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::centroid::AreaGeometry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Raw feature properties
///
/// Only the fields the explorer reads are named; the service sends many
/// more, which are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpaProperties {
    #[serde(rename = "NAME", default)]
    pub name: Option<Value>,
    #[serde(rename = "TYPE", default)]
    pub area_type: Option<Value>,
    #[serde(rename = "STATE", default)]
    pub state: Option<Value>,
    #[serde(rename = "AUTHORITY", default)]
    pub authority: Option<Value>,
    #[serde(rename = "LATITUDE", default)]
    pub latitude: Option<Value>,
    #[serde(rename = "LONGITUDE", default)]
    pub longitude: Option<Value>,
    #[serde(rename = "OBJECTID", default)]
    pub object_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single raw feature
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpaFeature {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Option<IpaProperties>,
    #[serde(default)]
    pub geometry: AreaGeometry,
}

/// The raw feature collection as returned by the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpaFeatureCollection {
    #[serde(default)]
    pub features: Vec<IpaFeature>,
}

/// Trait for protected area data sources
pub trait AreaSource: Send + Sync {
    /// Fetch the complete feature collection
    fn fetch_all(&self) -> impl std::future::Future<Output = Result<IpaFeatureCollection>> + Send;
}

/// HTTP client for the Australian Government IPA MapServer
#[derive(Debug, Clone)]
pub struct IpaService {
    client: reqwest::Client,
    url: String,
}

impl IpaService {
    /// Create a client from the `[services]` config section
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.services.user_agent)
            .timeout(Duration::from_secs(config.services.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.services.ipa_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AreaSource for IpaService {
    async fn fetch_all(&self) -> Result<IpaFeatureCollection> {
        debug!(url = %self.url, "Fetching protected areas");

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network {
                service: "IPA feature service",
                status,
            });
        }

        let collection: IpaFeatureCollection = response.json().await?;
        info!(features = collection.features.len(), "Protected areas fetched");

        Ok(collection)
    }
}
