//! Secret values supplied through the environment

use std::fmt;

/// An API key. Never printed: `Debug` and `Display` redact the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Read a key from the named environment variable.
    ///
    /// Unset or blank variables yield `None`.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Self)
    }

    /// The raw key, for building request credentials only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_redacted() {
        let key = ApiKey::new("sk-very-secret");
        assert_eq!(format!("{}", key), "<redacted>");
        assert!(!format!("{:?}", key).contains("secret"));
        assert_eq!(key.expose(), "sk-very-secret");
    }

    #[test]
    fn missing_env_var_is_none() {
        assert!(ApiKey::from_env("RESPITE_TEST_KEY_THAT_IS_NEVER_SET").is_none());
    }
}
