//! Caller identification

pub(crate) mod middleware;

/// Header carrying the authenticated user's id, set by the fronting session layer.
pub(crate) const USER_HEADER: &str = "x-user-id";
