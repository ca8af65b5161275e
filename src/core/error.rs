//! Error types for the Waypost engine

use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("sensor permission denied: {0}")]
    PermissionDenied(String),

    #[error("asset load failed for {url}: {reason}")]
    AssetLoad { url: String, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
