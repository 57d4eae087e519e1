use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {var_name}")]
    MissingEnvironmentVariable { var_name: String },
    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
}

/// Errors talking to the Spotify accounts service or Web API
#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API request failed: {status} - {message}")]
    ApiRequestFailed { status: u16, message: String },
    #[error("Rate limit exceeded, retry after: {retry_after_secs}s")]
    RateLimitExceeded { retry_after_secs: u64 },
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors reading or writing the favorites document store and token cache
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors raised while building a blend or aggregating favorites
#[derive(Debug, Error)]
pub enum BlendError {
    #[error("Artist {artist_id} returned {found} top tracks, need at least {required}")]
    InsufficientTrackFetch {
        artist_id: String,
        required: usize,
        found: usize,
    },
    #[error("Unknown user: {user_id}")]
    UnknownUser { user_id: String },
    #[error("Catalog error: {0}")]
    Catalog(#[from] SpotifyError),
    #[error("Preference store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors capturing a favorites snapshot into the store
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] SpotifyError),
    #[error("Preference store error: {0}")]
    Store(#[from] StoreError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type SpotifyResult<T> = Result<T, SpotifyError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type BlendResult<T> = Result<T, BlendError>;
pub type SnapshotResult<T> = Result<T, SnapshotError>;
