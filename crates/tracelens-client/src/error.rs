//! Client error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API key is not in `org-slug:app-slug` form
    #[error("Invalid API key: expected the `org-slug:app-slug` form")]
    InvalidApiKey,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The status endpoint answered with something unreadable
    #[error("Could not verify CLI status. Check your network connection and reinstall the Tracelens CLI if the problem persists.")]
    StatusUnreadable,

    /// The API refused this client version during the status check
    #[error("{message}")]
    Incompatible { message: String },

    /// The artifact endpoint granted no signed upload URL
    #[error("Could not get upload url for: {filepath}")]
    MissingUploadUrl { filepath: String },
}

impl ClientError {
    /// Check if this is a status-gate failure that should stop the calling
    /// tool with a nonzero exit
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StatusUnreadable | Self::Incompatible { .. })
    }
}
