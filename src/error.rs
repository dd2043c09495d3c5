use thiserror::Error;

/// Errors that can occur while browsing the recipe catalog
#[derive(Error, Debug)]
pub enum BrowserError {
    /// The catalog answered with a non-success status
    #[error("HTTP error! status: {status}")]
    HttpError { status: u16 },

    /// Transport-level failure talking to the catalog
    #[error("Failed to fetch from catalog: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Response body was not the JSON shape we expect
    #[error("Failed to decode catalog response: {0}")]
    DecodeError(#[from] serde_json::Error),

    /// Well-formed response without a matching record
    #[error("Recipe {0} not found")]
    NotFoundError(String),

    /// A raw record is missing a required field
    #[error("Malformed recipe record: missing `{field}`")]
    MalformedRecordError { field: &'static str },

    /// Favorites slot could not be read or parsed
    #[error("Failed to read favorites: {0}")]
    PersistenceReadError(String),

    /// Underlying storage failure
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// Page size must be a positive integer
    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, BrowserError>;
