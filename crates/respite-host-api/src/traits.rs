//! Speech engine trait

use async_trait::async_trait;
use thiserror::Error;

use crate::CaptureCapabilities;

/// Errors from speech capture
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Speech capture is not supported on this platform")]
    Unsupported,

    #[error("Speech capture failed: {0}")]
    Failed(String),
}

impl CaptureError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Outcome of one capture, delivered asynchronously
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Final, non-empty transcript
    Transcript(String),

    /// Capture ended without usable speech
    Failed(CaptureError),
}

/// Platform speech-to-text engine - implemented per platform or service
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Get the capabilities of this engine
    fn capabilities(&self) -> &CaptureCapabilities;

    /// Listen until the speaker stops and return one final transcript
    async fn listen(&self) -> CaptureResult<String>;
}
