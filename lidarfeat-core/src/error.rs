//! Error types for lidarfeat

use thiserror::Error;

/// Main error type for lidarfeat operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    #[error("Unsupported volume shape: {0}")]
    UnsupportedVolume(String),
}

/// Result type alias for lidarfeat operations
pub type Result<T> = std::result::Result<T, Error>;
