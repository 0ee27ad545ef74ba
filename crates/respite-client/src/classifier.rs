//! Emotion classifier interface

use async_trait::async_trait;
use respite_api::EmotionResult;
use std::time::Duration;
use thiserror::Error;

/// Classification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("Nothing to classify: {0}")]
    Validation(String),

    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),

    #[error("Classifier timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Classifier error: {0}")]
    Backend(String),
}

pub type ClassifyResult<T> = Result<T, ClassificationError>;

/// Turns free text into an emotion result with suggestions
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> ClassifyResult<EmotionResult>;
}

/// Reject empty input before any work is done
pub(crate) fn require_text(text: &str) -> ClassifyResult<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ClassificationError::Validation(
            "text is empty".into(),
        ));
    }
    Ok(trimmed)
}
