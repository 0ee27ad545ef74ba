//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Accepted countdown tick period, in milliseconds
pub const TICK_INTERVAL_RANGE_MS: std::ops::RangeInclusive<u64> = 10..=60_000;

/// Accepted request timeout, in seconds
pub const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=300;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("[{section}] {field}: invalid URL '{value}': {message}")]
    InvalidUrl {
        section: &'static str,
        field: &'static str,
        value: String,
        message: String,
    },

    #[error("[{section}] timeout_seconds = {value} is outside {min}..={max}")]
    TimeoutOutOfRange {
        section: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("[session] tick_interval_ms = {value} is outside {min}..={max}")]
    TickIntervalOutOfRange { value: u64, min: u64, max: u64 },

    #[error("[{section}] {field} cannot be empty")]
    EmptyValue {
        section: &'static str,
        field: &'static str,
    },

    #[error("[{section}] api_key_env '{value}' is not a valid environment variable name")]
    InvalidEnvVarName { section: &'static str, value: String },
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(url) = &config.backend.base_url {
        errors.extend(validate_url("backend", "base_url", url));
    }
    if let Some(secs) = config.backend.timeout_seconds {
        errors.extend(validate_timeout("backend", secs));
    }

    if let Some(url) = &config.persistence.base_url {
        errors.extend(validate_url("persistence", "base_url", url));
    }
    if let Some(secs) = config.persistence.timeout_seconds {
        errors.extend(validate_timeout("persistence", secs));
    }

    if let Some(user) = &config.session.user_id {
        if user.trim().is_empty() {
            errors.push(ValidationError::EmptyValue {
                section: "session",
                field: "user_id",
            });
        }
    }
    if let Some(ms) = config.session.tick_interval_ms {
        if !TICK_INTERVAL_RANGE_MS.contains(&ms) {
            errors.push(ValidationError::TickIntervalOutOfRange {
                value: ms,
                min: *TICK_INTERVAL_RANGE_MS.start(),
                max: *TICK_INTERVAL_RANGE_MS.end(),
            });
        }
    }

    if let Some(url) = &config.generative.endpoint {
        errors.extend(validate_url("generative", "endpoint", url));
    }
    if let Some(name) = &config.generative.api_key_env {
        errors.extend(validate_env_name("generative", name));
    }

    if let Some(url) = &config.transcription.endpoint {
        errors.extend(validate_url("transcription", "endpoint", url));
    }
    if let Some(model) = &config.transcription.model {
        if model.trim().is_empty() {
            errors.push(ValidationError::EmptyValue {
                section: "transcription",
                field: "model",
            });
        }
    }
    if let Some(name) = &config.transcription.api_key_env {
        errors.extend(validate_env_name("transcription", name));
    }

    errors
}

fn validate_url(
    section: &'static str,
    field: &'static str,
    value: &str,
) -> Option<ValidationError> {
    check_http_url(value)
        .err()
        .map(|message| ValidationError::InvalidUrl {
            section,
            field,
            value: value.to_string(),
            message,
        })
}

fn validate_timeout(section: &'static str, secs: u64) -> Option<ValidationError> {
    if TIMEOUT_RANGE_SECS.contains(&secs) {
        None
    } else {
        Some(ValidationError::TimeoutOutOfRange {
            section,
            value: secs,
            min: *TIMEOUT_RANGE_SECS.start(),
            max: *TIMEOUT_RANGE_SECS.end(),
        })
    }
}

fn validate_env_name(section: &'static str, name: &str) -> Option<ValidationError> {
    if is_env_var_name(name) {
        None
    } else {
        Some(ValidationError::InvalidEnvVarName {
            section,
            value: name.to_string(),
        })
    }
}

/// Check that a string looks like an absolute http(s) URL with a host
pub fn check_http_url(s: &str) -> Result<(), String> {
    let rest = s
        .strip_prefix("http://")
        .or_else(|| s.strip_prefix("https://"))
        .ok_or_else(|| "scheme must be http or https".to_string())?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err("missing host".into());
    }
    if s.chars().any(char::is_whitespace) {
        return Err("contains whitespace".into());
    }

    Ok(())
}

/// Environment variable names: ASCII letters, digits and underscores, not starting with a digit
pub fn is_env_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
