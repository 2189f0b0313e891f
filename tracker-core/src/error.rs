use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single call against the weather/geocoding provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("city name or query must not be empty")]
    EmptyQuery,

    #[error("failed to reach the weather provider: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status. `body` is truncated and
    /// kept for diagnostics only.
    #[error("weather provider returned status {status}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse weather provider response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure of the local key-value persistence behind the favorites list.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
