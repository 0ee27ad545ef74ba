//! Core events emitted by the engine

use respite_api::{ActivitySnapshot, ActivityType, Emotion};
use respite_util::{BreakSessionId, SessionToken, UserId};

/// Best-effort remote write requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum PersistRequest {
    /// Replace the remote completion list
    Update {
        token: SessionToken,
        session_id: BreakSessionId,
        activities: Vec<ActivitySnapshot>,
    },

    /// Finalize the remote record
    End {
        token: SessionToken,
        session_id: BreakSessionId,
        user_id: UserId,
        final_mood: Option<String>,
    },
}

impl PersistRequest {
    /// Token of the session instance that issued the request
    pub fn token(&self) -> SessionToken {
        match self {
            PersistRequest::Update { token, .. } | PersistRequest::End { token, .. } => *token,
        }
    }

    pub fn kind(&self) -> PersistKind {
        match self {
            PersistRequest::Update { .. } => PersistKind::Update,
            PersistRequest::End { .. } => PersistKind::End,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistKind {
    Update,
    End,
}

/// Events emitted by the core engine
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// An emotion result seeded the session
    SessionStarted {
        token: SessionToken,
        emotion: Emotion,
        session_id: Option<BreakSessionId>,
        activity_count: usize,
    },

    /// Countdown started
    ActivityStarted {
        token: SessionToken,
        kind: ActivityType,
        seconds: u64,
    },

    /// Countdown abandoned without completing
    ActivityStopped {
        token: SessionToken,
        kind: ActivityType,
        remaining_seconds: u64,
    },

    /// One second elapsed on the running activity
    CountdownTick {
        token: SessionToken,
        kind: ActivityType,
        remaining_seconds: u64,
    },

    /// Activity marked done, by the user or by the countdown reaching zero
    ActivityCompleted {
        token: SessionToken,
        kind: ActivityType,
        automatic: bool,
    },

    /// A remote write should be dispatched
    Persist(PersistRequest),

    /// The session instance was torn down by a new check
    SessionEnded {
        token: SessionToken,
        completed: usize,
        total: usize,
    },

    /// A fresh idle instance replaced the previous one
    SessionReset {
        previous: SessionToken,
        token: SessionToken,
    },
}
