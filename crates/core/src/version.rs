//! Version tokens for optimistic concurrency.
//!
//! A version token is the `updatedAt` string written alongside every mutation of a cart or
//! cart item. It carries no ordering semantics for the engine: two reads of the same document
//! that return different tokens mean somebody else wrote in between.

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Opaque version marker stored in a document's `updatedAt` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    /// Wrap a raw token as read from storage.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Mint a token from a timestamp (RFC 3339).
    #[must_use]
    pub fn from_timestamp(timestamp: Timestamp) -> Self {
        Self(timestamp.to_string())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a document read as `before` has since been written, given a later read `after`.
    #[must_use]
    pub fn has_changed(before: &Self, after: &Self) -> bool {
        before != after
    }
}

impl From<Timestamp> for VersionToken {
    fn from(value: Timestamp) -> Self {
        Self::from_timestamp(value)
    }
}

impl Display for VersionToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn tokens_from_distinct_timestamps_differ() -> TestResult {
        let first = Timestamp::UNIX_EPOCH;
        let second = first.checked_add(SignedDuration::from_nanos(1))?;

        let before = VersionToken::from_timestamp(first);
        let after = VersionToken::from_timestamp(second);

        assert!(VersionToken::has_changed(&before, &after));
        assert!(!VersionToken::has_changed(&before, &before.clone()));

        Ok(())
    }

    #[test]
    fn missing_token_defaults_to_empty() {
        assert_eq!(VersionToken::default().as_str(), "");
    }

    #[test]
    fn serializes_as_plain_string() -> TestResult {
        let token = VersionToken::new("2026-01-01T00:00:00Z");

        assert_eq!(serde_json::to_string(&token)?, "\"2026-01-01T00:00:00Z\"");

        Ok(())
    }
}
