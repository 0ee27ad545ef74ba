//! Async driver around the break engine
//!
//! Owns the countdown task and dispatches best-effort session mirror
//! writes. Everything that happens in the background comes back as a
//! [`ControllerMessage`], tagged with the session token (and, for ticks,
//! the countdown generation) it was started under, so late arrivals from
//! an old session or an old countdown can be recognized and dropped.

use respite_api::{ActivityType, BreakStatus, EmotionResult, MirrorStatus};
use respite_store::{SessionStore, StoreResult};
use respite_util::{SessionToken, UserId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{BreakEngine, CoreEvent, EngineResult, PersistKind, PersistRequest};

/// Background outcome delivered back to the controller
#[derive(Debug)]
pub enum ControllerMessage {
    /// One countdown period elapsed
    Tick {
        token: SessionToken,
        generation: u64,
    },

    /// A mirror write finished
    PersistDone {
        token: SessionToken,
        kind: PersistKind,
        outcome: StoreResult<()>,
    },
}

struct Countdown {
    generation: u64,
    task: JoinHandle<()>,
}

/// Drives a [`BreakEngine`] from a single task.
///
/// Local transitions apply synchronously; remote writes never block them
/// and their failures never change local state.
pub struct BreakController {
    engine: BreakEngine,
    store: Option<Arc<dyn SessionStore>>,
    tick_interval: Duration,
    tx: mpsc::UnboundedSender<ControllerMessage>,
    rx: mpsc::UnboundedReceiver<ControllerMessage>,
    countdown: Option<Countdown>,
    next_generation: u64,
    mirror: MirrorStatus,
    /// Mirror writes not yet answered, whichever session issued them
    in_flight: usize,
}

impl BreakController {
    /// `store` is `None` when remote mirroring is disabled
    pub fn new(
        store: Option<Arc<dyn SessionStore>>,
        user: Option<UserId>,
        tick_interval: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        info!(
            mirroring = store.is_some(),
            has_user = user.is_some(),
            tick_ms = tick_interval.as_millis() as u64,
            "Break controller initialized"
        );

        Self {
            engine: BreakEngine::new(user),
            store,
            tick_interval,
            tx,
            rx,
            countdown: None,
            next_generation: 0,
            mirror: MirrorStatus::default(),
            in_flight: 0,
        }
    }

    pub fn engine(&self) -> &BreakEngine {
        &self.engine
    }

    pub fn token(&self) -> SessionToken {
        self.engine.token()
    }

    pub fn set_user(&mut self, user: Option<UserId>) {
        self.engine.set_user(user);
    }

    pub fn mirror(&self) -> &MirrorStatus {
        &self.mirror
    }

    /// Whether a countdown task is currently scheduled
    pub fn countdown_active(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn status(&self) -> BreakStatus {
        let mut status = self.engine.status();
        status.mirror = self.mirror.clone();
        status
    }

    pub fn receive_emotion_result(&mut self, result: EmotionResult) -> EngineResult<Vec<CoreEvent>> {
        let events = self.engine.receive_emotion_result(result)?;
        Ok(self.apply(events))
    }

    pub fn start_activity(&mut self, kind: &ActivityType) -> EngineResult<Vec<CoreEvent>> {
        let events = self.engine.start_activity(kind)?;
        Ok(self.apply(events))
    }

    pub fn complete_activity(&mut self, kind: &ActivityType) -> EngineResult<Vec<CoreEvent>> {
        let events = self.engine.complete_activity(kind, respite_util::now())?;
        Ok(self.apply(events))
    }

    pub fn stop_activity(&mut self) -> Vec<CoreEvent> {
        let events = self.engine.stop_activity();
        self.apply(events)
    }

    pub fn request_new_check(&mut self, final_mood: Option<&str>) -> Vec<CoreEvent> {
        self.cancel_countdown();
        let events = self.engine.request_new_check(final_mood);
        self.apply(events)
    }

    /// Wait for the next background outcome
    pub async fn next_message(&mut self) -> Option<ControllerMessage> {
        self.rx.recv().await
    }

    /// Apply a background outcome, dropping it if it is stale
    pub fn handle_message(&mut self, message: ControllerMessage) -> Vec<CoreEvent> {
        match message {
            ControllerMessage::Tick { token, generation } => {
                let current = self.countdown.as_ref().map(|c| c.generation);
                if token != self.engine.token() || current != Some(generation) {
                    debug!(token = %token, generation, "Dropping stale tick");
                    return Vec::new();
                }
                let events = self.engine.tick(respite_util::now());
                self.apply(events)
            }

            ControllerMessage::PersistDone {
                token,
                kind,
                outcome,
            } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if token != self.engine.token() {
                    debug!(token = %token, kind = ?kind, "Discarding outcome for a previous session");
                    return Vec::new();
                }

                self.mirror.pending = self.mirror.pending.saturating_sub(1);
                match outcome {
                    Ok(()) => {
                        self.mirror.last_synced_at = Some(respite_util::now());
                    }
                    Err(e) => {
                        self.mirror.failures += 1;
                        self.mirror.last_error = Some(e.to_string());
                    }
                }
                Vec::new()
            }
        }
    }

    /// Wait for and apply one background outcome
    pub async fn pump(&mut self) -> Vec<CoreEvent> {
        match self.next_message().await {
            Some(message) => self.handle_message(message),
            None => Vec::new(),
        }
    }

    /// Keep applying background outcomes until every dispatched mirror
    /// write has answered or `limit` has passed. Returns whether all of
    /// them answered.
    pub async fn settle(&mut self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        while self.in_flight > 0 {
            match time::timeout_at(deadline, self.next_message()).await {
                Ok(Some(message)) => {
                    self.handle_message(message);
                }
                Ok(None) | Err(_) => break,
            }
        }

        if self.in_flight > 0 {
            debug!(in_flight = self.in_flight, "Gave up waiting for mirror writes");
        }
        self.in_flight == 0
    }

    /// React to engine events: countdown scheduling and mirror dispatch
    fn apply(&mut self, events: Vec<CoreEvent>) -> Vec<CoreEvent> {
        for event in &events {
            match event {
                CoreEvent::ActivityStarted { .. } => self.start_countdown(),
                CoreEvent::Persist(request) => self.dispatch(request.clone()),
                CoreEvent::SessionReset { .. } => self.mirror = MirrorStatus::default(),
                _ => {}
            }
        }

        if !self.engine.session().is_running() {
            self.cancel_countdown();
        }

        events
    }

    fn start_countdown(&mut self) {
        self.cancel_countdown();

        self.next_generation += 1;
        let generation = self.next_generation;
        let token = self.engine.token();
        let period = self.tick_interval;
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(ControllerMessage::Tick { token, generation }).is_err() {
                    break;
                }
            }
        });

        debug!(generation, "Countdown scheduled");
        self.countdown = Some(Countdown { generation, task });
    }

    fn cancel_countdown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.task.abort();
            debug!(generation = countdown.generation, "Countdown cancelled");
        }
    }

    fn dispatch(&mut self, request: PersistRequest) {
        let Some(store) = self.store.clone() else {
            debug!(kind = ?request.kind(), "Mirroring disabled, not dispatching");
            return;
        };

        self.in_flight += 1;
        if request.token() == self.engine.token() {
            self.mirror.pending += 1;
        }

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let token = request.token();
            let kind = request.kind();

            let outcome = match &request {
                PersistRequest::Update {
                    session_id,
                    activities,
                    ..
                } => store.update_session(session_id, activities).await,
                PersistRequest::End {
                    session_id,
                    user_id,
                    final_mood,
                    ..
                } => {
                    store
                        .end_session(session_id, user_id, final_mood.as_deref())
                        .await
                }
            };

            match &outcome {
                Ok(()) => debug!(token = %token, kind = ?kind, "Session mirror updated"),
                Err(e) => warn!(token = %token, kind = ?kind, error = %e, "Session mirror write failed"),
            }

            let _ = tx.send(ControllerMessage::PersistDone {
                token,
                kind,
                outcome,
            });
        });
    }
}

impl Drop for BreakController {
    fn drop(&mut self) {
        self.cancel_countdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use respite_api::{Activity, Emotion, SessionPhase, Suggestions};
    use respite_store::{MemoryStore, PersistenceError};
    use respite_util::BreakSessionId;

    fn result() -> EmotionResult {
        EmotionResult {
            emotion: Emotion::Tired,
            confidence: 0.3,
            message: String::new(),
            session_id: Some(BreakSessionId::new("s1")),
            suggestions: Suggestions {
                activities: vec![Activity {
                    kind: ActivityType::Breathing,
                    title: "Energizing Breath".into(),
                    description: String::new(),
                    duration: "1 min".into(),
                    instructions: vec![],
                }],
                ..Default::default()
            },
        }
    }

    fn controller(store: Arc<MemoryStore>) -> BreakController {
        BreakController::new(
            Some(store),
            Some(UserId::new("u1")),
            Duration::from_secs(1),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_until_completion() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(store.clone());
        controller.receive_emotion_result(result()).unwrap();
        controller.start_activity(&ActivityType::Breathing).unwrap();
        assert!(controller.countdown_active());

        let mut completed = false;
        while !completed {
            for event in controller.pump().await {
                if matches!(event, CoreEvent::ActivityCompleted { automatic: true, .. }) {
                    completed = true;
                }
            }
        }

        assert!(!controller.countdown_active());
        assert_eq!(controller.engine().phase(), SessionPhase::Suggesting);
        assert_eq!(controller.mirror().pending, 1);

        // Next message is the mirror outcome
        controller.pump().await;
        assert_eq!(controller.mirror().pending, 0);
        assert!(controller.mirror().last_synced_at.is_some());
        assert_eq!(store.update_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_tick_is_dropped() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = controller(store);
        controller.receive_emotion_result(result()).unwrap();
        controller.start_activity(&ActivityType::Breathing).unwrap();

        let token = controller.token();
        let events = controller.handle_message(ControllerMessage::Tick {
            token,
            generation: 999,
        });
        assert!(events.is_empty());
        assert_eq!(controller.engine().session().remaining_seconds(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn mirror_failure_is_recorded_not_surfaced() {
        let store = Arc::new(MemoryStore::new());
        store.set_failure(Some(PersistenceError::Network("offline".into())));
        let mut controller = controller(store.clone());
        controller.receive_emotion_result(result()).unwrap();

        controller.complete_activity(&ActivityType::Breathing).unwrap();
        controller.pump().await;

        let mirror = controller.mirror();
        assert_eq!(mirror.failures, 1);
        assert_eq!(mirror.pending, 0);
        assert!(mirror.last_error.as_deref().unwrap_or_default().contains("offline"));
        assert!(controller
            .engine()
            .session()
            .is_completed(&ActivityType::Breathing));
    }

    #[tokio::test(start_paused = true)]
    async fn settle_waits_for_the_end_call() {
        let store = Arc::new(MemoryStore::new());
        store.set_delay(Some(Duration::from_secs(2)));
        let mut controller = controller(store.clone());
        controller.receive_emotion_result(result()).unwrap();

        controller.request_new_check(None);
        assert!(store.end_calls().is_empty());

        assert!(controller.settle(Duration::from_secs(5)).await);
        assert_eq!(store.end_calls().len(), 1);
        assert!(controller.settle(Duration::from_secs(1)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn settle_gives_up_after_the_limit() {
        let store = Arc::new(MemoryStore::new());
        store.set_delay(Some(Duration::from_secs(30)));
        let mut controller = controller(store.clone());
        controller.receive_emotion_result(result()).unwrap();

        controller.request_new_check(Some("calm"));

        assert!(!controller.settle(Duration::from_secs(3)).await);
        assert!(store.end_calls().is_empty());
    }

    #[tokio::test]
    async fn disabled_mirroring_dispatches_nothing() {
        let mut controller =
            BreakController::new(None, Some(UserId::new("u1")), Duration::from_secs(1));
        controller.receive_emotion_result(result()).unwrap();
        controller.complete_activity(&ActivityType::Breathing).unwrap();
        assert_eq!(controller.mirror().pending, 0);
    }
}
