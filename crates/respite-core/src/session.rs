//! Break session state

use chrono::{DateTime, Local};
use respite_api::{Activity, ActivitySnapshot, ActivityType, EmotionResult, SessionPhase};
use respite_util::{BreakSessionId, SessionToken};
use std::collections::HashMap;

/// The activity currently counting down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningActivity {
    pub kind: ActivityType,
    pub remaining_seconds: u64,
}

/// One break session instance, from emotion result to new check.
///
/// A fresh instance (with a fresh token) replaces this one on reset.
#[derive(Debug, Clone)]
pub struct BreakSession {
    /// Identifies this instance; asynchronous outcomes carry it back
    pub token: SessionToken,

    pub phase: SessionPhase,

    /// The result that seeded this session; `None` while idle
    pub result: Option<EmotionResult>,

    /// At most one running activity
    pub active: Option<RunningActivity>,

    /// Completed types with their completion times; only ever grows
    pub completed: HashMap<ActivityType, DateTime<Local>>,
}

impl BreakSession {
    pub fn new() -> Self {
        Self {
            token: SessionToken::new(),
            phase: SessionPhase::Idle,
            result: None,
            active: None,
            completed: HashMap::new(),
        }
    }

    pub fn activities(&self) -> &[Activity] {
        self.result
            .as_ref()
            .map(|r| r.suggestions.activities.as_slice())
            .unwrap_or_default()
    }

    pub fn session_id(&self) -> Option<&BreakSessionId> {
        self.result.as_ref().and_then(|r| r.session_id.as_ref())
    }

    /// First activity of the given type
    pub fn find_activity(&self, kind: &ActivityType) -> Option<&Activity> {
        self.activities().iter().find(|a| &a.kind == kind)
    }

    pub fn is_completed(&self, kind: &ActivityType) -> bool {
        self.completed.contains_key(kind)
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.active.as_ref().map_or(0, |a| a.remaining_seconds)
    }

    /// Fraction of listed activities whose type has been completed
    pub fn progress(&self) -> f64 {
        let activities = self.activities();
        if activities.is_empty() {
            return 0.0;
        }

        let mut types: Vec<&ActivityType> = activities.iter().map(|a| &a.kind).collect();
        types.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        types.dedup();

        let done = types.iter().filter(|t| self.is_completed(t)).count();
        done as f64 / activities.len() as f64
    }

    /// Completion record for every listed activity, in list order
    pub fn snapshots(&self) -> Vec<ActivitySnapshot> {
        self.activities()
            .iter()
            .map(|a| {
                let completed_at = self.completed.get(&a.kind).copied();
                ActivitySnapshot {
                    kind: a.kind.clone(),
                    title: a.title.clone(),
                    duration: a.duration.clone(),
                    completed: completed_at.is_some(),
                    completed_at,
                }
            })
            .collect()
    }
}

impl Default for BreakSession {
    fn default() -> Self {
        Self::new()
    }
}
