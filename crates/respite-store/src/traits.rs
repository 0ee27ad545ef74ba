//! Store trait definitions

use async_trait::async_trait;
use respite_api::ActivitySnapshot;
use respite_util::{BreakSessionId, UserId};

use crate::StoreResult;

/// Remote break session record store
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Replace the activity completion list of a session
    async fn update_session(
        &self,
        session_id: &BreakSessionId,
        activities: &[ActivitySnapshot],
    ) -> StoreResult<()>;

    /// Finalize a session, optionally recording the user's mood afterwards
    async fn end_session(
        &self,
        session_id: &BreakSessionId,
        user_id: &UserId,
        final_mood: Option<&str>,
    ) -> StoreResult<()>;
}
