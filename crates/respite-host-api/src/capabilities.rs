//! Speech capability model

use serde::{Deserialize, Serialize};

/// Describes what a speech engine can do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureCapabilities {
    /// Whether speech-to-text is usable at all on this platform
    pub available: bool,

    /// Human-readable engine name (for logs)
    pub engine: String,
}

impl CaptureCapabilities {
    /// A working engine
    pub fn available(engine: impl Into<String>) -> Self {
        Self {
            available: true,
            engine: engine.into(),
        }
    }

    /// No speech capability; callers must fall back to typed input
    pub fn unsupported() -> Self {
        Self {
            available: false,
            engine: "none".into(),
        }
    }
}

impl Default for CaptureCapabilities {
    fn default() -> Self {
        Self::unsupported()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unsupported() {
        let caps = CaptureCapabilities::default();
        assert!(!caps.available);
    }

    #[test]
    fn available_records_engine_name() {
        let caps = CaptureCapabilities::available("whisper");
        assert!(caps.available);
        assert_eq!(caps.engine, "whisper");
    }
}
