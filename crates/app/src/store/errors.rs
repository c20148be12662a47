//! Document store errors.

use thiserror::Error;

/// Errors returned by a [`DocumentStore`](super::DocumentStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No document with the requested id exists.
    #[error("document not found")]
    NotFound,

    /// A document with the same id already exists, or the store reported a write conflict.
    #[error("document conflict")]
    Conflict,

    /// The store could not be reached or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request.
    #[error("store rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// A stored document did not have the expected shape.
    #[error("malformed document: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Whether repeating the same operation may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Conflict | Self::Unavailable(_))
    }

    /// Map an HTTP status returned by a store into an error.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => Self::NotFound,
            409 => Self::Conflict,
            408 | 429 | 500..=599 => Self::Unavailable(format!("status {status}: {message}")),
            _ => Self::Rejected { status, message },
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Malformed(error.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::Malformed(error.to_string());
        }

        Self::Unavailable(error.to_string())
    }
}
