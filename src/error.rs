/// Error types shared across the application
///
/// Each concern gets its own enum so callers can match on what went wrong:
/// - `Error` for configuration and filesystem access
/// - `CountError` for the remote count script
/// - `FetchError` for CDN image downloads

use thiserror::Error;

/// Result alias for configuration and I/O operations
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and filesystem errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

/// Failures while resolving the remote count table
///
/// None of these are fatal: the gallery falls back to the static table.
#[derive(Debug, Error)]
pub enum CountError {
    #[error("count script request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("count script returned HTTP {0}")]
    Status(u16),

    #[error("count script did not answer within {0} ms")]
    Timeout(u64),

    #[error("count script does not assign __picCounts")]
    MissingTable,

    #[error("malformed count table: {0}")]
    Malformed(String),
}

/// Failures while downloading a single image from the CDN
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("empty response body")]
    Empty,
}
