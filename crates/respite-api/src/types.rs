//! Emotion results, suggestions and activities

use chrono::{DateTime, Local};
use respite_util::BreakSessionId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::{ActivityDuration, DurationError};

/// Emotion label reported by the classifier.
///
/// Labels the classifier may invent beyond this set collapse to `Calm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Emotion {
    #[default]
    Calm,
    Stressed,
    Tired,
    Focused,
    Sad,
    Happy,
    Angry,
    Confused,
}

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Calm,
        Emotion::Stressed,
        Emotion::Tired,
        Emotion::Focused,
        Emotion::Sad,
        Emotion::Happy,
        Emotion::Angry,
        Emotion::Confused,
    ];

    /// Parse a label, falling back to the default for anything unrecognized
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "calm" => Emotion::Calm,
            "stressed" => Emotion::Stressed,
            "tired" => Emotion::Tired,
            "focused" => Emotion::Focused,
            "sad" => Emotion::Sad,
            "happy" => Emotion::Happy,
            "angry" => Emotion::Angry,
            "confused" => Emotion::Confused,
            _ => Emotion::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Calm => "calm",
            Emotion::Stressed => "stressed",
            Emotion::Tired => "tired",
            Emotion::Focused => "focused",
            Emotion::Sad => "sad",
            Emotion::Happy => "happy",
            Emotion::Angry => "angry",
            Emotion::Confused => "confused",
        }
    }
}

impl From<String> for Emotion {
    fn from(s: String) -> Self {
        Emotion::from_label(&s)
    }
}

impl From<Emotion> for String {
    fn from(e: Emotion) -> Self {
        e.as_str().to_string()
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category tag of a suggested activity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    Breathing,
    Meditation,
    Movement,
    Creative,
    Nature,
    Celebration,
    Sharing,
    Brain,
    Planning,
    Other(String),
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::Breathing => "breathing",
            ActivityType::Meditation => "meditation",
            ActivityType::Movement => "movement",
            ActivityType::Creative => "creative",
            ActivityType::Nature => "nature",
            ActivityType::Celebration => "celebration",
            ActivityType::Sharing => "sharing",
            ActivityType::Brain => "brain",
            ActivityType::Planning => "planning",
            ActivityType::Other(label) => label,
        }
    }
}

impl From<&str> for ActivityType {
    fn from(s: &str) -> Self {
        let label = s.trim().to_ascii_lowercase();
        match label.as_str() {
            "breathing" => ActivityType::Breathing,
            "meditation" => ActivityType::Meditation,
            "movement" => ActivityType::Movement,
            "creative" => ActivityType::Creative,
            "nature" => ActivityType::Nature,
            "celebration" => ActivityType::Celebration,
            "sharing" => ActivityType::Sharing,
            "brain" => ActivityType::Brain,
            "planning" => ActivityType::Planning,
            _ => ActivityType::Other(label),
        }
    }
}

impl From<String> for ActivityType {
    fn from(s: String) -> Self {
        ActivityType::from(s.as_str())
    }
}

impl From<ActivityType> for String {
    fn from(t: ActivityType) -> Self {
        match t {
            ActivityType::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recommended break action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Display duration, e.g. "5 minutes"
    pub duration: String,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl Activity {
    /// Parsed timer length
    pub fn timer_duration(&self) -> Result<ActivityDuration, DurationError> {
        self.duration.parse()
    }
}

/// Color tokens used to theme the suggestion view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    #[serde(alias = "bg")]
    pub background: String,
}

impl ColorScheme {
    pub fn new(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
            background: background.into(),
        }
    }

    /// Built-in palette for an emotion
    pub fn for_emotion(emotion: Emotion) -> Self {
        match emotion {
            Emotion::Stressed => Self::new("#f97316", "#ea580c", "#fed7aa"),
            Emotion::Tired => Self::new("#8b5cf6", "#7c3aed", "#ddd6fe"),
            Emotion::Sad => Self::new("#3b82f6", "#2563eb", "#bfdbfe"),
            Emotion::Happy => Self::new("#eab308", "#ca8a04", "#fef3c7"),
            Emotion::Calm => Self::new("#06b6d4", "#0891b2", "#a5f3fc"),
            Emotion::Focused => Self::new("#10b981", "#059669", "#a7f3d0"),
            Emotion::Angry => Self::new("#ef4444", "#dc2626", "#fecaca"),
            Emotion::Confused => Self::new("#6b7280", "#4b5563", "#d1d5db"),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::for_emotion(Emotion::default())
    }
}

/// Suggested activities plus presentation extras
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Suggestions {
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub affirmation: String,
    #[serde(default, alias = "colorScheme")]
    pub color_scheme: ColorScheme,
}

/// Structured result of emotion classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    #[serde(default)]
    pub emotion: Emotion,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub message: String,
    #[serde(
        default,
        rename = "sessionId",
        alias = "session_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<BreakSessionId>,
    pub suggestions: Suggestions,
}

/// Why an emotion result cannot seed a break session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResultError {
    #[error("emotion result carries no activities")]
    NoActivities,

    #[error("activity '{title}': {source}")]
    InvalidDuration {
        title: String,
        #[source]
        source: DurationError,
    },

    #[error("confidence {0} is not a number")]
    InvalidConfidence(f64),
}

impl EmotionResult {
    /// Clamp confidence into [0, 1]
    pub fn normalized(mut self) -> Result<Self, ResultError> {
        if !self.confidence.is_finite() {
            return Err(ResultError::InvalidConfidence(self.confidence));
        }
        self.confidence = self.confidence.clamp(0.0, 1.0);
        Ok(self)
    }

    /// Check the invariants a break session relies on
    pub fn validate(&self) -> Result<(), ResultError> {
        if self.suggestions.activities.is_empty() {
            return Err(ResultError::NoActivities);
        }

        for activity in &self.suggestions.activities {
            activity
                .timer_duration()
                .map_err(|source| ResultError::InvalidDuration {
                    title: activity.title.clone(),
                    source,
                })?;
        }

        Ok(())
    }
}

/// Per-activity completion record sent to the session store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySnapshot {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub title: String,
    pub duration: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Local>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND_PAYLOAD: &str = r##"{
        "emotion": "stressed",
        "confidence": 0.82,
        "message": "I detected that you're feeling stressed.",
        "sessionId": "sess-1",
        "suggestions": {
            "emotion": "stressed",
            "activities": [{
                "type": "breathing",
                "title": "Box Breathing Exercise",
                "duration": "3 minutes",
                "description": "Inhale for 4, hold for 4",
                "instructions": ["Sit comfortably", "Inhale for 4 counts"]
            }],
            "affirmation": "This feeling is temporary and will pass",
            "color_scheme": {"primary": "#f97316", "secondary": "#ea580c", "bg": "#fed7aa"}
        }
    }"##;

    #[test]
    fn decodes_backend_payload() {
        let result: EmotionResult = serde_json::from_str(BACKEND_PAYLOAD).unwrap();
        assert_eq!(result.emotion, Emotion::Stressed);
        assert_eq!(result.session_id, Some(BreakSessionId::new("sess-1")));
        assert_eq!(result.suggestions.activities.len(), 1);
        assert_eq!(result.suggestions.activities[0].kind, ActivityType::Breathing);
        assert_eq!(result.suggestions.color_scheme.background, "#fed7aa");
        assert!(result.validate().is_ok());
    }

    #[test]
    fn unknown_emotion_falls_back_to_calm() {
        assert_eq!(Emotion::from_label("overjoyed"), Emotion::Calm);
        assert_eq!(Emotion::from_label(" Happy "), Emotion::Happy);

        let result: EmotionResult =
            serde_json::from_str(r#"{"emotion": "neutral", "suggestions": {"activities": []}}"#)
                .unwrap();
        assert_eq!(result.emotion, Emotion::Calm);
    }

    #[test]
    fn unknown_activity_type_is_preserved() {
        let kind = ActivityType::from("Story");
        assert_eq!(kind, ActivityType::Other("story".into()));
        assert_eq!(String::from(kind), "story");
    }

    #[test]
    fn validate_rejects_empty_and_bad_durations() {
        let mut result: EmotionResult = serde_json::from_str(BACKEND_PAYLOAD).unwrap();
        result.suggestions.activities[0].duration = "75 minutes".into();
        assert!(matches!(
            result.validate(),
            Err(ResultError::InvalidDuration { .. })
        ));

        result.suggestions.activities.clear();
        assert_eq!(result.validate(), Err(ResultError::NoActivities));
    }

    #[test]
    fn normalized_clamps_confidence() {
        let mut result: EmotionResult = serde_json::from_str(BACKEND_PAYLOAD).unwrap();
        result.confidence = 1.7;
        assert_eq!(result.clone().normalized().unwrap().confidence, 1.0);

        result.confidence = f64::NAN;
        assert!(result.normalized().is_err());
    }

    #[test]
    fn snapshot_uses_camel_case() {
        let snapshot = ActivitySnapshot {
            kind: ActivityType::Movement,
            title: "Stretch".into(),
            duration: "8 min".into(),
            completed: false,
            completed_at: None,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["type"], "movement");
        assert!(json.get("completedAt").is_none());
    }
}
