//! Client errors.

use thiserror::Error;
use trolley::{CartItemUuid, QuantityError};

/// Errors surfaced by the cart API and the session.
///
/// Cloneable so the session can keep the last failure around for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("not found")]
    NotFound,

    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("server unavailable: {0}")]
    Unavailable(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    InvalidQuantity(#[from] QuantityError),

    #[error("item {0} is not in the cart")]
    UnknownItem(CartItemUuid),

    #[error("no cart loaded")]
    NoCart,
}

impl ClientError {
    /// Map a non-success HTTP status into an error.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => Self::NotFound,
            502..=504 => Self::Unavailable(message),
            _ => Self::Rejected { status, message },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::Decode(error.to_string());
        }

        Self::Transport(error.to_string())
    }
}
