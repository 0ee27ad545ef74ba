//! Generative text wrapper (summaries, quizzes, free questions)

use reqwest::header::HeaderValue;
use reqwest::{Client, Url};
use respite_util::ApiKey;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::{error_message, map_send_error, ServiceError, ServiceResult};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

const API_KEY_HEADER: &str = "x-goog-api-key";

pub fn summary_prompt(text: &str) -> String {
    format!("Summarize the following for a student:\n{}", text)
}

pub fn quiz_prompt(text: &str) -> String {
    format!("Create 3 quiz questions (with answers) from this material:\n{}", text)
}

/// Client for a `generateContent` style endpoint.
///
/// The key travels in the `x-goog-api-key` header, marked sensitive, and
/// is never logged.
#[derive(Debug, Clone)]
pub struct GenerativeTextClient {
    client: Client,
    endpoint: Url,
    api_key: ApiKey,
    timeout: Duration,
}

impl GenerativeTextClient {
    pub fn new(endpoint: &str, api_key: ApiKey, timeout: Duration) -> ServiceResult<Self> {
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
            api_key,
            timeout,
        })
    }

    /// Summarize study material
    pub async fn summarize(&self, text: &str) -> ServiceResult<String> {
        let text = non_empty(text)?;
        self.generate(&summary_prompt(text)).await
    }

    /// Create three quiz questions with answers
    pub async fn quiz(&self, text: &str) -> ServiceResult<String> {
        let text = non_empty(text)?;
        self.generate(&quiz_prompt(text)).await
    }

    /// Ask a question; sent verbatim
    pub async fn ask(&self, question: &str) -> ServiceResult<String> {
        let question = non_empty(question)?;
        self.generate(question).await
    }

    async fn generate(&self, prompt: &str) -> ServiceResult<String> {
        debug!(endpoint = %self.endpoint, prompt_chars = prompt.len(), "Requesting generated text");

        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let mut key = HeaderValue::from_str(self.api_key.expose())
            .map_err(|_| ServiceError::Network("API key contains invalid characters".into()))?;
        key.set_sensitive(true);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, key)
            .json(&request)
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

        extract_text(&body)
    }
}

fn non_empty(text: &str) -> ServiceResult<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ServiceError::EmptyInput)
    } else {
        Ok(trimmed)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body
pub fn extract_text(body: &str) -> ServiceResult<String> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| ServiceError::MalformedResponse("response has no candidate text".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts() {
        assert_eq!(
            summary_prompt("Photosynthesis converts light."),
            "Summarize the following for a student:\nPhotosynthesis converts light."
        );
        assert!(quiz_prompt("cells").starts_with("Create 3 quiz questions (with answers)"));
    }

    #[test]
    fn request_body_shape() {
        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn extracts_first_candidate_text() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Plants make food."}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        }"#;
        assert_eq!(extract_text(body).unwrap(), "Plants make food.");
    }

    #[test]
    fn missing_text_is_malformed() {
        assert!(matches!(
            extract_text(r#"{"candidates": []}"#),
            Err(ServiceError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_text(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#),
            Err(ServiceError::MalformedResponse(_))
        ));
    }

    #[test]
    fn key_is_not_in_debug_output() {
        let client = GenerativeTextClient::new(
            "https://example.com/v1/models/m:generateContent",
            ApiKey::new("super-secret-key"),
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(!format!("{:?}", client).contains("super-secret-key"));
    }

    #[tokio::test]
    async fn key_stays_out_of_network_errors() {
        // Nothing listens on the discard port
        let client = GenerativeTextClient::new(
            "http://127.0.0.1:9/v1/models/m:generateContent",
            ApiKey::new("SUPERSECRETKEY123"),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.summarize("notes").await.unwrap_err();

        assert!(
            matches!(err, ServiceError::Network(_) | ServiceError::Timeout(_)),
            "{:?}",
            err
        );
        assert!(!err.to_string().contains("SUPERSECRETKEY123"), "{}", err);
        assert!(!format!("{:?}", err).contains("SUPERSECRETKEY123"));
    }

    #[tokio::test]
    async fn empty_input_sends_nothing() {
        let client = GenerativeTextClient::new(
            "http://127.0.0.1:9/generate",
            ApiKey::new("k"),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.summarize("  ").await, Err(ServiceError::EmptyInput));
        assert_eq!(client.ask("").await, Err(ServiceError::EmptyInput));
    }
}
