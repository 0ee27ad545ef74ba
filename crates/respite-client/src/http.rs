//! HTTP emotion classifier backed by the respite backend

use async_trait::async_trait;
use reqwest::{Client, Url};
use respite_api::EmotionResult;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::classifier::require_text;
use crate::{error_message, ClassificationError, ClassifyResult, EmotionClassifier};

#[derive(Debug, Serialize)]
struct DetectRequest<'a> {
    text: &'a str,
    timestamp: String,
}

/// Classifier speaking to `POST {base}/api/detect-emotion`.
///
/// One request per call. No retries, no caching.
#[derive(Debug, Clone)]
pub struct HttpEmotionClassifier {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpEmotionClassifier {
    pub fn new(base_url: &str, timeout: Duration) -> ClassifyResult<Self> {
        let mut endpoint = Url::parse(base_url).map_err(|e| {
            ClassificationError::Network(format!("invalid base URL '{}': {}", base_url, e))
        })?;
        endpoint
            .path_segments_mut()
            .map_err(|_| {
                ClassificationError::Network(format!("base URL '{}' cannot hold a path", base_url))
            })?
            .pop_if_empty()
            .extend(["api", "detect-emotion"]);

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ClassificationError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EmotionClassifier for HttpEmotionClassifier {
    async fn classify(&self, text: &str) -> ClassifyResult<EmotionResult> {
        let text = require_text(text)?;
        debug!(url = %self.endpoint, chars = text.len(), "Requesting emotion classification");

        let request = DetectRequest {
            text,
            timestamp: respite_util::now().to_rfc3339(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassificationError::Timeout(self.timeout)
                } else {
                    ClassificationError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ClassificationError::Timeout(self.timeout)
            } else {
                ClassificationError::Network(e.to_string())
            }
        })?;

        let result = decode_response(status.as_u16(), &body)?;
        info!(
            emotion = %result.emotion,
            confidence = result.confidence,
            activities = result.suggestions.activities.len(),
            has_session = result.session_id.is_some(),
            "Emotion classified"
        );
        Ok(result)
    }
}

/// Decode a classifier response.
///
/// Accepts a bare result, a `{success: true, data: {...}}` envelope, and
/// reports `{success: false, error}` or non-2xx statuses as backend errors.
pub fn decode_response(status: u16, body: &str) -> ClassifyResult<EmotionResult> {
    if !(200..300).contains(&status) {
        let message = error_message(body);
        return Err(ClassificationError::Backend(if message.is_empty() {
            format!("HTTP {}", status)
        } else {
            message
        }));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ClassificationError::MalformedResponse(e.to_string()))?;

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("classification failed")
            .to_string();
        return Err(ClassificationError::Backend(message));
    }

    let payload = match value.get("data") {
        Some(data) if data.is_object() => data.clone(),
        _ => value,
    };

    let result: EmotionResult = serde_json::from_value(payload)
        .map_err(|e| ClassificationError::MalformedResponse(e.to_string()))?;

    result
        .normalized()
        .map_err(|e| ClassificationError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use respite_api::Emotion;
    use respite_util::BreakSessionId;

    const RESULT: &str = r#"{
        "emotion": "tired",
        "confidence": 1.4,
        "message": "I detected that you're feeling tired.",
        "sessionId": "abc",
        "suggestions": {
            "activities": [
                {"type": "breathing", "title": "Energizing Breath", "duration": "3 min"}
            ],
            "affirmation": "Rest is productive and necessary"
        }
    }"#;

    #[test]
    fn endpoint_is_built_from_base() {
        let classifier =
            HttpEmotionClassifier::new("http://127.0.0.1:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            classifier.endpoint().as_str(),
            "http://127.0.0.1:5000/api/detect-emotion"
        );
    }

    #[test]
    fn decodes_bare_result_and_clamps_confidence() {
        let result = decode_response(200, RESULT).unwrap();
        assert_eq!(result.emotion, Emotion::Tired);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.session_id, Some(BreakSessionId::new("abc")));
    }

    #[test]
    fn decodes_success_envelope() {
        let body = format!(r#"{{"success": true, "data": {}}}"#, RESULT);
        let result = decode_response(200, &body).unwrap();
        assert_eq!(result.emotion, Emotion::Tired);
    }

    #[test]
    fn failure_payload_is_backend_error() {
        let result = decode_response(200, r#"{"success": false, "error": "model offline"}"#);
        assert_eq!(
            result,
            Err(ClassificationError::Backend("model offline".into()))
        );
    }

    #[test]
    fn http_error_status_is_backend_error() {
        let result = decode_response(500, r#"{"error": "internal"}"#);
        assert_eq!(result, Err(ClassificationError::Backend("internal".into())));

        let result = decode_response(502, "");
        assert_eq!(result, Err(ClassificationError::Backend("HTTP 502".into())));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        // Suggestions as bare strings cannot seed a session
        let body = r#"{"emotion": "neutral", "confidence": 0.8, "suggestions": ["Take a walk"]}"#;
        assert!(matches!(
            decode_response(200, body),
            Err(ClassificationError::MalformedResponse(_))
        ));

        assert!(matches!(
            decode_response(200, "not json"),
            Err(ClassificationError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn empty_text_short_circuits() {
        // Port 9 is discard; nothing should be sent anyway
        let classifier =
            HttpEmotionClassifier::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let result = classifier.classify("   ").await;
        assert!(matches!(result, Err(ClassificationError::Validation(_))));
    }
}
