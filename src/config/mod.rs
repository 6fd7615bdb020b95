//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/ipa-explore/config.toml

pub mod defaults;

use crate::constants::api::{IPA_URL, NOMINATIM_URL};
use crate::constants::search::NEARBY_COUNT;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream service settings
    #[serde(default)]
    pub services: ServicesConfig,

    /// Nearby search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// CLI output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Upstream service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// IPA feature service query URL (must return GeoJSON)
    #[serde(default = "default_ipa_url")]
    pub ipa_url: String,

    /// Nominatim base URL
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language sent to the geocoder
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Nearby search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// How many nearby areas a town search returns
    #[serde(default = "default_nearby_count")]
    pub nearby_count: usize,

    /// Derive missing area coordinates from the geometry centroid
    #[serde(default)]
    pub centroid_fallback: bool,
}

/// CLI output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions for serde
fn default_ipa_url() -> String {
    IPA_URL.to_string()
}
fn default_geocoder_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    format!("{}/{}", APP_DIR_NAME, env!("CARGO_PKG_VERSION"))
}
fn default_accept_language() -> String {
    DEFAULT_ACCEPT_LANGUAGE.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_nearby_count() -> usize {
    NEARBY_COUNT
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            ipa_url: default_ipa_url(),
            geocoder_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            nearby_count: default_nearby_count(),
            centroid_fallback: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            let config: Config = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Reject values `set` would refuse
    pub fn validate(&self) -> Result<()> {
        if self.search.nearby_count == 0 {
            return Err(Error::Config("Nearby count must be at least 1".to_string()));
        }
        if crate::format::get_formatter(&self.output.format).is_none() {
            return Err(Error::Config(format!("Unknown format: {}", self.output.format)));
        }
        Ok(())
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["services", "ipa_url"] => Some(self.services.ipa_url.clone()),
            ["services", "geocoder_url"] => Some(self.services.geocoder_url.clone()),
            ["services", "user_agent"] => Some(self.services.user_agent.clone()),
            ["services", "accept_language"] => Some(self.services.accept_language.clone()),
            ["services", "timeout_secs"] => Some(self.services.timeout_secs.to_string()),

            ["search", "nearby_count"] => Some(self.search.nearby_count.to_string()),
            ["search", "centroid_fallback"] => Some(self.search.centroid_fallback.to_string()),

            ["output", "format"] => Some(self.output.format.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["services", "ipa_url"] => {
                self.services.ipa_url = value.to_string();
            }
            ["services", "geocoder_url"] => {
                self.services.geocoder_url = value.to_string();
            }
            ["services", "user_agent"] => {
                self.services.user_agent = value.to_string();
            }
            ["services", "accept_language"] => {
                self.services.accept_language = value.to_string();
            }
            ["services", "timeout_secs"] => {
                self.services.timeout_secs = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
            }

            ["search", "nearby_count"] => {
                let count: usize = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid count value: {}", value))
                })?;
                if count == 0 {
                    return Err(Error::Config("Nearby count must be at least 1".to_string()));
                }
                self.search.nearby_count = count;
            }
            ["search", "centroid_fallback"] => {
                self.search.centroid_fallback = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid boolean value: {}", value))
                })?;
            }

            ["output", "format"] => {
                if crate::format::get_formatter(value).is_none() {
                    return Err(Error::Config(format!("Unknown format: {}", value)));
                }
                self.output.format = value.to_lowercase();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "services.ipa_url",
            "services.geocoder_url",
            "services.user_agent",
            "services.accept_language",
            "services.timeout_secs",
            "search.nearby_count",
            "search.centroid_fallback",
            "output.format",
            "server.host",
            "server.port",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
