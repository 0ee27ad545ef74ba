//! Strongly-typed identifiers for respite

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a break session record persisted by the backend.
///
/// Opaque to respite: it is only ever echoed back to the session store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakSessionId(String);

impl BreakSessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BreakSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BreakSessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BreakSessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifies one controller session instance.
///
/// Every asynchronous completion carries the token it was dispatched under,
/// so results that arrive after a reset can be recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_equality() {
        let id1 = BreakSessionId::new("abc");
        let id2 = BreakSessionId::from("abc");
        let id3 = BreakSessionId::new("xyz");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn session_token_uniqueness() {
        let t1 = SessionToken::new();
        let t2 = SessionToken::new();
        assert_ne!(t1, t2);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = BreakSessionId::new("sess-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"sess-42\"");

        let parsed: UserId = serde_json::from_str("\"user-7\"").unwrap();
        assert_eq!(parsed.as_str(), "user-7");
    }
}
