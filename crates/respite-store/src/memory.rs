//! In-memory session store for tests and offline runs

use async_trait::async_trait;
use respite_api::ActivitySnapshot;
use respite_util::{BreakSessionId, UserId};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{PersistenceError, SessionStore, StoreResult};

/// A call received by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Update {
        session_id: BreakSessionId,
        activities: Vec<ActivitySnapshot>,
    },
    End {
        session_id: BreakSessionId,
        user_id: UserId,
        final_mood: Option<String>,
    },
}

/// Records every call; failures and latency are configurable
#[derive(Default)]
pub struct MemoryStore {
    calls: Arc<Mutex<Vec<StoreCall>>>,

    /// Configure every call to fail with this error
    pub fail_with: Arc<Mutex<Option<PersistenceError>>>,

    /// Simulated round-trip latency
    pub delay: Arc<Mutex<Option<Duration>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failure(&self, error: Option<PersistenceError>) {
        *self.fail_with.lock().unwrap() = error;
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    /// All calls in arrival order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, StoreCall::Update { .. }))
            .collect()
    }

    pub fn end_calls(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, StoreCall::End { .. }))
            .collect()
    }

    async fn record(&self, call: StoreCall) -> StoreResult<()> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.calls.lock().unwrap().push(call);

        let failure = self.fail_with.lock().unwrap().clone();
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn update_session(
        &self,
        session_id: &BreakSessionId,
        activities: &[ActivitySnapshot],
    ) -> StoreResult<()> {
        self.record(StoreCall::Update {
            session_id: session_id.clone(),
            activities: activities.to_vec(),
        })
        .await
    }

    async fn end_session(
        &self,
        session_id: &BreakSessionId,
        user_id: &UserId,
        final_mood: Option<&str>,
    ) -> StoreResult<()> {
        self.record(StoreCall::End {
            session_id: session_id.clone(),
            user_id: user_id.clone(),
            final_mood: final_mood.map(str::to_string),
        })
        .await
    }
}
