//! Speech engine doubles for testing and headless runs

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{CaptureCapabilities, CaptureError, CaptureResult, SpeechEngine};

/// Scripted speech engine: each `listen` pops the next outcome
pub struct MockSpeechEngine {
    capabilities: CaptureCapabilities,
    script: Arc<Mutex<VecDeque<CaptureResult<String>>>>,
    listens: AtomicUsize,

    /// Simulated time spent listening
    pub delay: Arc<Mutex<Option<Duration>>>,
}

impl MockSpeechEngine {
    pub fn new() -> Self {
        Self {
            capabilities: CaptureCapabilities::available("mock"),
            script: Arc::new(Mutex::new(VecDeque::new())),
            listens: AtomicUsize::new(0),
            delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue a transcript for the next capture
    pub fn push_transcript(&self, text: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a failure for the next capture
    pub fn push_error(&self, error: CaptureError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Number of times `listen` was entered
    pub fn listen_count(&self) -> usize {
        self.listens.load(Ordering::SeqCst)
    }
}

impl Default for MockSpeechEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechEngine for MockSpeechEngine {
    fn capabilities(&self) -> &CaptureCapabilities {
        &self.capabilities
    }

    async fn listen(&self) -> CaptureResult<String> {
        self.listens.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CaptureError::failed("no speech detected")))
    }
}

/// Engine for platforms without speech-to-text
#[derive(Debug, Default)]
pub struct UnsupportedSpeechEngine {
    capabilities: CaptureCapabilities,
}

impl UnsupportedSpeechEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpeechEngine for UnsupportedSpeechEngine {
    fn capabilities(&self) -> &CaptureCapabilities {
        &self.capabilities
    }

    async fn listen(&self) -> CaptureResult<String> {
        Err(CaptureError::Unsupported)
    }
}
