//! Validated settings (converted from raw config)

use crate::schema::RawConfig;
use respite_util::{ApiKey, UserId};
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_GENERATIVE_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";
pub const DEFAULT_TRANSCRIPTION_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
pub const DEFAULT_GENERATIVE_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_TRANSCRIPTION_KEY_ENV: &str = "WHISPER_API_KEY";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Validated application settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: BackendSettings,
    pub persistence: PersistenceSettings,
    pub session: SessionSettings,
    pub generative: GenerativeSettings,
    pub transcription: TranscriptionSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceSettings {
    pub enabled: bool,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub user_id: Option<UserId>,
    pub tick_interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerativeSettings {
    pub endpoint: String,
    pub api_key_env: String,
}

impl GenerativeSettings {
    /// Look up the API key in the environment
    pub fn api_key(&self) -> Option<ApiKey> {
        ApiKey::from_env(&self.api_key_env)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
}

impl TranscriptionSettings {
    pub fn api_key(&self) -> Option<ApiKey> {
        ApiKey::from_env(&self.api_key_env)
    }
}

impl Settings {
    /// Convert from an already-validated raw config
    pub fn from_raw(raw: RawConfig) -> Self {
        let backend_url = raw
            .backend
            .base_url
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let backend_timeout = raw
            .backend
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let persistence = PersistenceSettings {
            enabled: raw.persistence.enabled.unwrap_or(true),
            base_url: raw
                .persistence
                .base_url
                .unwrap_or_else(|| backend_url.clone()),
            timeout: raw
                .persistence
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(backend_timeout),
        };

        let session = SessionSettings {
            user_id: raw
                .session
                .user_id
                .map(|u| UserId::new(u.trim())),
            tick_interval: raw
                .session
                .tick_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TICK_INTERVAL),
        };

        let generative = GenerativeSettings {
            endpoint: raw
                .generative
                .endpoint
                .unwrap_or_else(|| DEFAULT_GENERATIVE_ENDPOINT.to_string()),
            api_key_env: raw
                .generative
                .api_key_env
                .unwrap_or_else(|| DEFAULT_GENERATIVE_KEY_ENV.to_string()),
        };

        let transcription = TranscriptionSettings {
            endpoint: raw
                .transcription
                .endpoint
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_ENDPOINT.to_string()),
            model: raw
                .transcription
                .model
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
            api_key_env: raw
                .transcription
                .api_key_env
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_KEY_ENV.to_string()),
        };

        Self {
            backend: BackendSettings {
                base_url: backend_url,
                timeout: backend_timeout,
            },
            persistence,
            session,
            generative,
            transcription,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_raw(RawConfig {
            config_version: crate::CURRENT_CONFIG_VERSION,
            ..RawConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.backend.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(settings.backend.timeout, DEFAULT_TIMEOUT);
        assert!(settings.persistence.enabled);
        assert_eq!(settings.persistence.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(settings.session.user_id, None);
        assert_eq!(settings.session.tick_interval, Duration::from_secs(1));
        assert_eq!(settings.transcription.model, "whisper-1");
        assert_eq!(settings.generative.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn persistence_inherits_backend() {
        let raw: RawConfig = toml::from_str(
            r#"
            config_version = 1

            [backend]
            base_url = "https://respite.example.com"
            timeout_seconds = 7
            "#,
        )
        .unwrap();

        let settings = Settings::from_raw(raw);
        assert_eq!(settings.persistence.base_url, "https://respite.example.com");
        assert_eq!(settings.persistence.timeout, Duration::from_secs(7));
    }

    #[test]
    fn user_id_is_trimmed() {
        let raw: RawConfig = toml::from_str(
            r#"
            config_version = 1

            [session]
            user_id = "  student-7 "
            "#,
        )
        .unwrap();

        let settings = Settings::from_raw(raw);
        assert_eq!(settings.session.user_id, Some(UserId::new("student-7")));
    }
}
