use core::fmt;
use serde::{Deserialize, Serialize};

use crate::{SwError, SwResult};

/// Opaque identifier assigned to a record by the document store.
///
/// The contents carry no meaning on this side; equality is the only
/// operation reconciliation relies on.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a store-provided identifier without checking it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse user-supplied text (CLI arguments) into an identifier.
    pub fn parse(raw: &str) -> SwResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SwError::InvalidId {
                id: raw.to_string(),
                reason: "empty",
            });
        }
        if trimmed.contains('/') {
            return Err(SwError::InvalidId {
                id: raw.to_string(),
                reason: "contains '/'",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for RecordId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let id = RecordId::parse("  abc123 ").unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn parse_rejects_empty_and_paths() {
        assert!(RecordId::parse("   ").is_err());
        assert!(RecordId::parse("expenses/abc").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RecordId::new("k9");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"k9\"");
    }
}
