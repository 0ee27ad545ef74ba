//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Emotion classification backend
    #[serde(default)]
    pub backend: RawBackendConfig,

    /// Remote break session records
    #[serde(default)]
    pub persistence: RawPersistenceConfig,

    /// Break session behaviour
    #[serde(default)]
    pub session: RawSessionConfig,

    /// Generative text service (summaries, quizzes, Q&A)
    #[serde(default)]
    pub generative: RawGenerativeConfig,

    /// Speech transcription service
    #[serde(default)]
    pub transcription: RawTranscriptionConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawBackendConfig {
    /// Base URL of the backend (default: http://127.0.0.1:5000)
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPersistenceConfig {
    /// Mirror session progress remotely (default: true)
    pub enabled: Option<bool>,

    /// Base URL of the session store (defaults to the backend URL)
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSessionConfig {
    /// Authenticated user; without one nothing is mirrored remotely
    pub user_id: Option<String>,

    /// Countdown tick period in milliseconds (default: 1000)
    pub tick_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawGenerativeConfig {
    /// generateContent endpoint
    pub endpoint: Option<String>,

    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTranscriptionConfig {
    /// Transcription endpoint
    pub endpoint: Option<String>,

    /// Transcription model name
    pub model: Option<String>,

    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
}
