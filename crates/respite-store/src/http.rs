//! HTTP session store backed by the respite backend

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use respite_api::ActivitySnapshot;
use respite_util::{BreakSessionId, UserId};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::{PersistenceError, SessionStore, StoreResult};

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    activities: &'a [ActivitySnapshot],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EndBody<'a> {
    user_id: &'a UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    mood: Option<&'a str>,
}

/// Session store speaking to `/api/break-sessions/{id}`
#[derive(Debug, Clone)]
pub struct HttpSessionStore {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpSessionStore {
    pub fn new(base_url: &str, timeout: Duration) -> StoreResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PersistenceError::Network(format!("invalid base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| PersistenceError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    fn session_url(&self, session_id: &BreakSessionId, suffix: Option<&str>) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                PersistenceError::Network(format!("base URL '{}' cannot hold a path", self.base_url))
            })?;
            segments
                .pop_if_empty()
                .extend(["api", "break-sessions", session_id.as_str()]);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    fn map_send_error(&self, e: reqwest::Error) -> PersistenceError {
        if e.is_timeout() {
            PersistenceError::Timeout(self.timeout)
        } else {
            PersistenceError::Network(e.to_string())
        }
    }

    async fn check_status(
        response: reqwest::Response,
        session_id: &BreakSessionId,
    ) -> StoreResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(PersistenceError::NotFound(session_id.to_string()));
        }

        let message = response.text().await.unwrap_or_default();
        Err(PersistenceError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SessionStore for HttpSessionStore {
    async fn update_session(
        &self,
        session_id: &BreakSessionId,
        activities: &[ActivitySnapshot],
    ) -> StoreResult<()> {
        let url = self.session_url(session_id, None)?;
        debug!(%url, activity_count = activities.len(), "Updating break session");

        let response = self
            .client
            .patch(url)
            .json(&UpdateBody { activities })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response, session_id).await
    }

    async fn end_session(
        &self,
        session_id: &BreakSessionId,
        user_id: &UserId,
        final_mood: Option<&str>,
    ) -> StoreResult<()> {
        let url = self.session_url(session_id, Some("end"))?;
        debug!(%url, has_mood = final_mood.is_some(), "Ending break session");

        let response = self
            .client
            .post(url)
            .json(&EndBody {
                user_id,
                mood: final_mood,
            })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response, session_id).await
    }
}
