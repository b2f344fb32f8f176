//! Provider thread token.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a provider-side conversation thread.
///
/// Issued by the provider on the first turn and reused verbatim on every
/// subsequent turn of the same conversation. The relay never stores one; the
/// conversation client holds the authoritative reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Creates a thread id from a provider-issued token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ThreadId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_id_round_trips_token() {
        let id = ThreadId::new("thread_abc123");
        assert_eq!(id.as_str(), "thread_abc123");
        assert_eq!(id.to_string(), "thread_abc123");
    }

    #[test]
    fn thread_id_serializes_transparently() {
        let id = ThreadId::new("t_123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"t_123\"");
    }
}
