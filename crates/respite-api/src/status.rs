//! Presentation views of a break session

use chrono::{DateTime, Local};
use respite_util::{format_countdown, BreakSessionId, SessionToken};
use serde::{Deserialize, Serialize};

use crate::{Activity, ActivityType, ColorScheme, Emotion};

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No emotion result yet
    Idle,
    /// Suggestions shown, nothing running
    Suggesting,
    /// One activity is counting down
    ActivityRunning,
    /// New check requested; the instance is being torn down
    Ending,
}

/// Health of the best-effort remote mirror
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorStatus {
    /// Requests dispatched but not yet answered
    pub pending: u32,
    /// Last successful write
    pub last_synced_at: Option<DateTime<Local>>,
    /// Failures seen in this session instance
    pub failures: u32,
    pub last_error: Option<String>,
}

/// One activity as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityView {
    pub activity: Activity,
    pub completed: bool,
    pub running: bool,
}

/// Full snapshot of a break session for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakStatus {
    pub token: SessionToken,
    pub phase: SessionPhase,
    pub emotion: Option<Emotion>,
    pub confidence: Option<f64>,
    pub message: Option<String>,
    pub affirmation: Option<String>,
    pub colors: Option<ColorScheme>,
    pub session_id: Option<BreakSessionId>,
    pub activities: Vec<ActivityView>,
    pub active: Option<ActivityType>,
    pub remaining_seconds: u64,
    pub progress: f64,
    pub mirror: MirrorStatus,
}

impl BreakStatus {
    /// Remaining time as `M:SS`
    pub fn remaining_display(&self) -> String {
        format_countdown(self.remaining_seconds)
    }

    /// Completed count over total, for "2 of 3 done" style labels
    pub fn completed_count(&self) -> (usize, usize) {
        let done = self.activities.iter().filter(|a| a.completed).count();
        (done, self.activities.len())
    }
}
