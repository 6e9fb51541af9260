//! Correlation identifier for request-pair tracking
//!
//! A correlation id links one logical request, the two responses captured
//! for it (reference and candidate), and the comparison result produced from
//! them. The engine treats it as opaque.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque token linking one logical request's two captured responses to its
/// comparison result
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new random CorrelationId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (e.g. an id issued by the forwarder)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for CorrelationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CorrelationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_id_generation() {
        let id1 = CorrelationId::new();
        let id2 = CorrelationId::new();

        // Should generate different IDs
        assert_ne!(id1, id2);

        // Should be non-empty strings
        assert!(!id1.as_str().is_empty());
        assert!(!id2.as_str().is_empty());
    }

    #[test]
    fn test_correlation_id_display() {
        let id = CorrelationId::new();
        let display_str = format!("{}", id);
        assert_eq!(display_str, id.as_str());
    }

    #[test]
    fn test_correlation_id_from_external_string() {
        let id = CorrelationId::from("req-42");
        assert_eq!(id.as_str(), "req-42");
        assert_eq!(id, CorrelationId::from_string("req-42".to_string()));
    }

    #[test]
    fn test_serialization_is_transparent() {
        let id = CorrelationId::from("req-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"req-7\"");
        let deserialized: CorrelationId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
