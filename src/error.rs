//! Error types for ipa-explore

use crate::area::AreaId;
use thiserror::Error;

/// Main error type for ipa-explore operations
#[derive(Error, Debug)]
pub enum Error {
    /// An upstream service answered with a non-success status
    #[error("{service} returned status: {status}")]
    Network {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset unavailable: {0}")]
    Dataset(String),

    /// A town search that produced no usable place
    #[error("{0}")]
    TownSearch(String),

    #[error("Unknown protected area: {0}")]
    UnknownArea(AreaId),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for ipa-explore operations
pub type Result<T> = std::result::Result<T, Error>;
