//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default geocoder request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default Accept-Language header sent to the geocoder
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-AU";

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "ipa-explore";
