//! Break session engine
//!
//! Pure, synchronous state machine. Every operation applies its local
//! transition immediately and describes side effects (remote writes) as
//! events for the caller to dispatch.

use chrono::{DateTime, Local};
use respite_api::{
    ActivityType, ActivityView, BreakStatus, EmotionResult, MirrorStatus, ResultError,
    SessionPhase,
};
use respite_util::{SessionToken, UserId};
use thiserror::Error;
use tracing::{debug, info};

use crate::{BreakSession, CoreEvent, PersistRequest, RunningActivity};

/// Why an engine operation was rejected. State is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("A break session is already in progress ({phase:?})")]
    NotIdle { phase: SessionPhase },

    #[error("Emotion result rejected: {0}")]
    Invalid(#[from] ResultError),

    #[error("No suggestions yet; capture an emotion first")]
    NoSuggestions,

    #[error("No suggested activity of type '{0}'")]
    UnknownActivity(ActivityType),
}

pub type EngineResult<T> = Result<T, TransitionError>;

/// The break session state machine
#[derive(Debug, Default)]
pub struct BreakEngine {
    session: BreakSession,

    /// Authenticated user; survives session resets
    user: Option<UserId>,
}

impl BreakEngine {
    pub fn new(user: Option<UserId>) -> Self {
        Self {
            session: BreakSession::new(),
            user,
        }
    }

    pub fn set_user(&mut self, user: Option<UserId>) {
        self.user = user;
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn session(&self) -> &BreakSession {
        &self.session
    }

    pub fn token(&self) -> SessionToken {
        self.session.token
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase
    }

    /// Seed the session with a classifier result.
    ///
    /// Only accepted while idle; a result arriving in any other phase is
    /// rejected and leaves the session untouched.
    pub fn receive_emotion_result(&mut self, result: EmotionResult) -> EngineResult<Vec<CoreEvent>> {
        if self.session.phase != SessionPhase::Idle {
            debug!(
                token = %self.session.token,
                phase = ?self.session.phase,
                "Ignoring emotion result outside idle"
            );
            return Err(TransitionError::NotIdle {
                phase: self.session.phase,
            });
        }

        let result = result.normalized()?;
        result.validate()?;

        let event = CoreEvent::SessionStarted {
            token: self.session.token,
            emotion: result.emotion,
            session_id: result.session_id.clone(),
            activity_count: result.suggestions.activities.len(),
        };

        info!(
            token = %self.session.token,
            emotion = %result.emotion,
            confidence = result.confidence,
            activities = result.suggestions.activities.len(),
            session_id = ?result.session_id,
            "Break session started"
        );

        self.session.result = Some(result);
        self.session.phase = SessionPhase::Suggesting;

        Ok(vec![event])
    }

    /// Start the countdown for an activity type.
    ///
    /// Starting a different type while one runs stops the current one first.
    /// Starting the type that is already running is a no-op.
    pub fn start_activity(&mut self, kind: &ActivityType) -> EngineResult<Vec<CoreEvent>> {
        self.require_suggestions()?;

        let activity = self
            .session
            .find_activity(kind)
            .ok_or_else(|| TransitionError::UnknownActivity(kind.clone()))?;
        let seconds = activity
            .timer_duration()
            .map_err(|source| ResultError::InvalidDuration {
                title: activity.title.clone(),
                source,
            })?
            .seconds();

        if self.session.active.as_ref().is_some_and(|a| &a.kind == kind) {
            debug!(kind = %kind, "Activity already running");
            return Ok(Vec::new());
        }

        let mut events = self.stop_activity();

        self.session.active = Some(RunningActivity {
            kind: kind.clone(),
            remaining_seconds: seconds,
        });
        self.session.phase = SessionPhase::ActivityRunning;

        info!(token = %self.session.token, kind = %kind, seconds, "Activity started");

        events.push(CoreEvent::ActivityStarted {
            token: self.session.token,
            kind: kind.clone(),
            seconds,
        });
        Ok(events)
    }

    /// Advance the running countdown by one second.
    ///
    /// Reaching zero completes the activity; further ticks are no-ops.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<CoreEvent> {
        let Some(active) = self.session.active.as_mut() else {
            debug!("Tick with nothing running");
            return Vec::new();
        };

        active.remaining_seconds = active.remaining_seconds.saturating_sub(1);
        let kind = active.kind.clone();
        let remaining_seconds = active.remaining_seconds;

        let mut events = vec![CoreEvent::CountdownTick {
            token: self.session.token,
            kind: kind.clone(),
            remaining_seconds,
        }];

        if remaining_seconds == 0 {
            events.extend(self.mark_completed(&kind, now, true));
        }

        events
    }

    /// Mark an activity type done.
    ///
    /// Idempotent. Any running countdown is cleared, whichever type it
    /// belongs to, and the session is back to `Suggesting`.
    pub fn complete_activity(
        &mut self,
        kind: &ActivityType,
        now: DateTime<Local>,
    ) -> EngineResult<Vec<CoreEvent>> {
        self.require_suggestions()?;
        if self.session.find_activity(kind).is_none() {
            return Err(TransitionError::UnknownActivity(kind.clone()));
        }
        Ok(self.mark_completed(kind, now, false))
    }

    /// Abandon the running countdown without completing it
    pub fn stop_activity(&mut self) -> Vec<CoreEvent> {
        let Some(active) = self.session.active.take() else {
            return Vec::new();
        };
        self.session.phase = SessionPhase::Suggesting;

        info!(
            token = %self.session.token,
            kind = %active.kind,
            remaining_seconds = active.remaining_seconds,
            "Activity stopped"
        );

        vec![CoreEvent::ActivityStopped {
            token: self.session.token,
            kind: active.kind,
            remaining_seconds: active.remaining_seconds,
        }]
    }

    /// End this session and start over with a fresh idle instance.
    ///
    /// Allowed from any phase. The remote record is finalized only when a
    /// session id and a user are both known; the local reset happens
    /// regardless.
    pub fn request_new_check(&mut self, final_mood: Option<&str>) -> Vec<CoreEvent> {
        let previous = self.session.token;
        self.session.active = None;
        self.session.phase = SessionPhase::Ending;

        let mut events = Vec::new();

        if self.session.result.is_some() {
            let completed = self
                .session
                .activities()
                .iter()
                .filter(|a| self.session.is_completed(&a.kind))
                .count();
            let total = self.session.activities().len();

            info!(token = %previous, completed, total, "Break session ended");
            events.push(CoreEvent::SessionEnded {
                token: previous,
                completed,
                total,
            });
        }

        if let (Some(session_id), Some(user_id)) = (self.session.session_id(), self.user.as_ref()) {
            let final_mood = final_mood
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string);

            events.push(CoreEvent::Persist(PersistRequest::End {
                token: previous,
                session_id: session_id.clone(),
                user_id: user_id.clone(),
                final_mood,
            }));
        }

        self.session = BreakSession::new();
        debug!(previous = %previous, token = %self.session.token, "Session reset");

        events.push(CoreEvent::SessionReset {
            previous,
            token: self.session.token,
        });
        events
    }

    pub fn progress(&self) -> f64 {
        self.session.progress()
    }

    /// Presentation snapshot; the mirror status is left at its default
    pub fn status(&self) -> BreakStatus {
        let session = &self.session;
        let result = session.result.as_ref();
        let active = session.active.as_ref().map(|a| a.kind.clone());

        let activities = session
            .activities()
            .iter()
            .map(|a| ActivityView {
                activity: a.clone(),
                completed: session.is_completed(&a.kind),
                running: active.as_ref() == Some(&a.kind),
            })
            .collect();

        BreakStatus {
            token: session.token,
            phase: session.phase,
            emotion: result.map(|r| r.emotion),
            confidence: result.map(|r| r.confidence),
            message: result.map(|r| r.message.clone()),
            affirmation: result.map(|r| r.suggestions.affirmation.clone()),
            colors: result.map(|r| r.suggestions.color_scheme.clone()),
            session_id: session.session_id().cloned(),
            activities,
            active,
            remaining_seconds: session.remaining_seconds(),
            progress: session.progress(),
            mirror: MirrorStatus::default(),
        }
    }

    fn require_suggestions(&self) -> EngineResult<()> {
        match self.session.phase {
            SessionPhase::Suggesting | SessionPhase::ActivityRunning => Ok(()),
            SessionPhase::Idle | SessionPhase::Ending => Err(TransitionError::NoSuggestions),
        }
    }

    fn mark_completed(
        &mut self,
        kind: &ActivityType,
        now: DateTime<Local>,
        automatic: bool,
    ) -> Vec<CoreEvent> {
        let mut events = Vec::new();

        if let Some(active) = self.session.active.take() {
            self.session.phase = SessionPhase::Suggesting;
            if &active.kind != kind {
                info!(
                    token = %self.session.token,
                    kind = %active.kind,
                    remaining_seconds = active.remaining_seconds,
                    "Running activity cleared by completion"
                );
                events.push(CoreEvent::ActivityStopped {
                    token: self.session.token,
                    kind: active.kind,
                    remaining_seconds: active.remaining_seconds,
                });
            }
        }

        if self.session.is_completed(kind) {
            debug!(kind = %kind, "Activity already completed");
            return events;
        }
        self.session.completed.insert(kind.clone(), now);

        info!(
            token = %self.session.token,
            kind = %kind,
            automatic,
            progress = self.session.progress(),
            "Activity completed"
        );

        events.push(CoreEvent::ActivityCompleted {
            token: self.session.token,
            kind: kind.clone(),
            automatic,
        });

        if let (Some(session_id), Some(_)) = (self.session.session_id(), self.user.as_ref()) {
            events.push(CoreEvent::Persist(PersistRequest::Update {
                token: self.session.token,
                session_id: session_id.clone(),
                activities: self.session.snapshots(),
            }));
        }

        events
    }
}
