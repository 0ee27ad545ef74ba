//! Single-capture adapter around a speech engine

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{CaptureError, CaptureEvent, CaptureResult, SpeechEngine};

struct ActiveCapture {
    id: u64,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct CaptureSlot {
    next_id: u64,
    active: Option<ActiveCapture>,
}

/// Wraps a [`SpeechEngine`] so that at most one capture runs at a time.
///
/// Outcomes arrive on the receiver returned by [`SpeechCapture::new`]. The
/// adapter is back to idle before an outcome is published, whatever it is.
pub struct SpeechCapture {
    engine: Arc<dyn SpeechEngine>,
    slot: Arc<Mutex<CaptureSlot>>,
    event_tx: mpsc::UnboundedSender<CaptureEvent>,
}

impl SpeechCapture {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> (Self, mpsc::UnboundedReceiver<CaptureEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let capture = Self {
            engine,
            slot: Arc::new(Mutex::new(CaptureSlot::default())),
            event_tx,
        };

        (capture, event_rx)
    }

    /// Whether the wrapped engine can capture at all
    pub fn is_supported(&self) -> bool {
        self.engine.capabilities().available
    }

    /// Begin listening.
    ///
    /// Fails immediately with [`CaptureError::Unsupported`] when the engine
    /// has no speech capability. Starting while a capture is in flight is a
    /// no-op.
    pub async fn start_capture(&self) -> CaptureResult<()> {
        if !self.is_supported() {
            return Err(CaptureError::Unsupported);
        }

        let mut slot = self.slot.lock().await;
        if slot.active.is_some() {
            debug!("Capture already in progress, ignoring start");
            return Ok(());
        }

        slot.next_id += 1;
        let id = slot.next_id;

        let engine = self.engine.clone();
        let slot_ref = self.slot.clone();
        let tx = self.event_tx.clone();

        // The task cannot clear the slot before we release the lock below.
        let task = tokio::spawn(async move {
            let outcome = engine.listen().await;

            {
                let mut slot = slot_ref.lock().await;
                if slot.active.as_ref().is_some_and(|a| a.id == id) {
                    slot.active = None;
                }
            }

            let event = match outcome {
                Ok(text) if text.trim().is_empty() => {
                    CaptureEvent::Failed(CaptureError::failed("no speech detected"))
                }
                Ok(text) => CaptureEvent::Transcript(text.trim().to_string()),
                Err(e) => CaptureEvent::Failed(e),
            };

            debug!(capture_id = id, event = ?event, "Capture finished");
            let _ = tx.send(event);
        });

        slot.active = Some(ActiveCapture { id, task });

        info!(
            capture_id = id,
            engine = %self.engine.capabilities().engine,
            "Speech capture started"
        );

        Ok(())
    }

    /// Cancel the in-flight capture, if any. No event is published for it.
    pub async fn stop_capture(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(active) = slot.active.take() {
            active.task.abort();
            info!(capture_id = active.id, "Speech capture stopped");
        }
    }

    pub async fn is_capturing(&self) -> bool {
        self.slot.lock().await.active.is_some()
    }
}

impl Drop for SpeechCapture {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.slot.try_lock()
            && let Some(active) = slot.active.take()
        {
            active.task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockSpeechEngine, UnsupportedSpeechEngine};
    use std::time::Duration;

    #[tokio::test]
    async fn unsupported_engine_fails_immediately() {
        let (capture, _rx) = SpeechCapture::new(Arc::new(UnsupportedSpeechEngine::new()));

        let result = capture.start_capture().await;

        assert_eq!(result, Err(CaptureError::Unsupported));
        assert!(!capture.is_capturing().await);
    }

    #[tokio::test]
    async fn transcript_is_delivered_and_state_resets() {
        let engine = Arc::new(MockSpeechEngine::new());
        engine.push_transcript("  I feel a bit stressed  ");
        let (capture, mut rx) = SpeechCapture::new(engine);

        capture.start_capture().await.unwrap();
        let event = rx.recv().await.unwrap();

        assert_eq!(event, CaptureEvent::Transcript("I feel a bit stressed".into()));
        assert!(!capture.is_capturing().await);
    }

    #[tokio::test]
    async fn empty_transcript_is_a_failure() {
        let engine = Arc::new(MockSpeechEngine::new());
        engine.push_transcript("   ");
        let (capture, mut rx) = SpeechCapture::new(engine);

        capture.start_capture().await.unwrap();

        assert!(matches!(
            rx.recv().await.unwrap(),
            CaptureEvent::Failed(CaptureError::Failed(_))
        ));
        assert!(!capture.is_capturing().await);
    }

    #[tokio::test]
    async fn engine_error_is_forwarded() {
        let engine = Arc::new(MockSpeechEngine::new());
        engine.push_error(CaptureError::failed("permission denied"));
        let (capture, mut rx) = SpeechCapture::new(engine);

        capture.start_capture().await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            CaptureEvent::Failed(CaptureError::failed("permission denied"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_does_not_open_another_capture() {
        let engine = Arc::new(MockSpeechEngine::new());
        engine.set_delay(Some(Duration::from_secs(2)));
        engine.push_transcript("hello");
        let (capture, mut rx) = SpeechCapture::new(engine.clone());

        capture.start_capture().await.unwrap();
        tokio::task::yield_now().await;
        capture.start_capture().await.unwrap();
        assert!(capture.is_capturing().await);

        assert_eq!(rx.recv().await.unwrap(), CaptureEvent::Transcript("hello".into()));
        assert_eq!(engine.listen_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_without_event() {
        let engine = Arc::new(MockSpeechEngine::new());
        engine.set_delay(Some(Duration::from_secs(5)));
        engine.push_transcript("never delivered");
        let (capture, mut rx) = SpeechCapture::new(engine);

        capture.start_capture().await.unwrap();
        capture.stop_capture().await;
        assert!(!capture.is_capturing().await);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }
}
