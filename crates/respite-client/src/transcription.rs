//! Speech transcription wrapper and a file-backed speech engine

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use respite_host_api::{CaptureCapabilities, CaptureError, CaptureResult, SpeechEngine};
use respite_util::ApiKey;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::{error_message, map_send_error, ServiceError, ServiceResult};

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Uploads an audio file and returns its transcript.
///
/// One multipart request per file; no chunking or streaming.
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    client: Client,
    endpoint: Url,
    model: String,
    api_key: ApiKey,
    timeout: Duration,
}

impl TranscriptionClient {
    pub fn new(
        endpoint: &str,
        model: impl Into<String>,
        api_key: ApiKey,
        timeout: Duration,
    ) -> ServiceResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ServiceError::Network(format!("invalid endpoint '{}': {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            model: model.into(),
            api_key,
            timeout,
        })
    }

    pub async fn transcribe(&self, path: &Path) -> ServiceResult<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ServiceError::Io(format!("{}: {}", path.display(), e)))?;
        if bytes.is_empty() {
            return Err(ServiceError::EmptyInput);
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        debug!(endpoint = %self.endpoint, file = %file_name, bytes = bytes.len(), "Uploading audio");

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("model", self.model.clone());

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.expose())
            .multipart(form)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        if !status.is_success() {
            return Err(ServiceError::Backend {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;
        info!(chars = parsed.text.len(), "Audio transcribed");
        Ok(parsed.text)
    }
}

/// Speech engine whose "listening" is transcribing a recorded file
pub struct TranscriptionSpeechEngine {
    client: TranscriptionClient,
    audio: PathBuf,
    capabilities: CaptureCapabilities,
}

impl TranscriptionSpeechEngine {
    pub fn new(client: TranscriptionClient, audio: impl Into<PathBuf>) -> Self {
        Self {
            client,
            audio: audio.into(),
            capabilities: CaptureCapabilities::available("transcription"),
        }
    }
}

#[async_trait]
impl SpeechEngine for TranscriptionSpeechEngine {
    fn capabilities(&self) -> &CaptureCapabilities {
        &self.capabilities
    }

    async fn listen(&self) -> CaptureResult<String> {
        self.client
            .transcribe(&self.audio)
            .await
            .map_err(|e| CaptureError::failed(e.to_string()))
    }
}
