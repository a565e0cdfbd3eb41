use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the World Bank library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// These are start-up failures. Per-request upstream failures use
/// [`crate::UpstreamError`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The dataset file is missing or cannot be read. Fatal at start-up.
    #[error("dataset unavailable at {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    /// The dataset was readable but its contents do not match the expected table shape.
    #[error("invalid dataset: {message}")]
    DatasetSchema { message: String },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the dataset")]
    DataDirsUnavailable,

    /// A configured upstream base URL could not be used.
    #[error("invalid upstream url {url}: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for HTTP client construction errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
