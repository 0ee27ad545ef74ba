//! Service clients for respite
//!
//! Provides:
//! - `EmotionClassifier` with an HTTP implementation and an offline
//!   keyword-based one
//! - The built-in suggestion catalog used by the offline classifier
//! - Thin wrappers over the generative text and transcription services
//! - A speech engine that transcribes a recorded audio file

mod catalog;
mod classifier;
mod generative;
mod http;
mod keyword;
mod transcription;

pub use catalog::*;
pub use classifier::*;
pub use generative::*;
pub use http::*;
pub use keyword::*;
pub use transcription::*;

use std::time::Duration;
use thiserror::Error;

/// Errors from the generative text and transcription wrappers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to read audio file: {0}")]
    Io(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Request URLs are stripped from the message; they may carry credentials
pub(crate) fn map_send_error(e: reqwest::Error, timeout: Duration) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout(timeout)
    } else {
        ServiceError::Network(e.without_url().to_string())
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"error": "..."}` and `{"error": {"message": "..."}}`;
/// anything else is returned trimmed as-is.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|v| {
        let err = v.get("error")?;
        err.as_str()
            .map(str::to_string)
            .or_else(|| err.get("message")?.as_str().map(str::to_string))
    });
    from_json.unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_error_messages() {
        assert_eq!(error_message(r#"{"error": "boom"}"#), "boom");
        assert_eq!(
            error_message(r#"{"error": {"code": 400, "message": "API key not valid"}}"#),
            "API key not valid"
        );
        assert_eq!(error_message(" Bad Gateway \n"), "Bad Gateway");
    }
}
