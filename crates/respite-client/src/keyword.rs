//! Offline emotion classifier using keyword matching

use async_trait::async_trait;
use respite_api::{Emotion, EmotionResult};
use tracing::debug;

use crate::classifier::require_text;
use crate::{suggestions_for, ClassifyResult, EmotionClassifier};

/// Inputs shorter than this (after trimming) are not scored
const MIN_TEXT_CHARS: usize = 3;

/// Confidence added per matched keyword
const CONFIDENCE_PER_HIT: f64 = 0.3;

/// Confidence reported when nothing matched
const FALLBACK_CONFIDENCE: f64 = 0.5;

const TOO_SHORT_MESSAGE: &str =
    "Please speak a bit more so I can better understand your emotional state.";

/// Scanned in this order; on a tie the earlier emotion wins
const KEYWORDS: &[(Emotion, &[&str])] = &[
    (
        Emotion::Stressed,
        &["stressed", "anxious", "worried", "overwhelmed", "pressure", "panic", "nervous", "tense"],
    ),
    (
        Emotion::Tired,
        &["tired", "exhausted", "sleepy", "fatigue", "drained", "weary", "worn out"],
    ),
    (
        Emotion::Sad,
        &["sad", "depressed", "down", "upset", "disappointed", "gloomy", "melancholy"],
    ),
    (
        Emotion::Angry,
        &["angry", "mad", "frustrated", "irritated", "annoyed", "furious", "rage"],
    ),
    (
        Emotion::Happy,
        &["happy", "joy", "excited", "cheerful", "glad", "delighted", "thrilled"],
    ),
    (
        Emotion::Calm,
        &["calm", "peaceful", "relaxed", "serene", "tranquil", "content"],
    ),
    (
        Emotion::Focused,
        &["focused", "concentrated", "determined", "motivated", "productive"],
    ),
    (
        Emotion::Confused,
        &["confused", "lost", "uncertain", "puzzled", "unclear", "bewildered"],
    ),
];

/// Score text against the keyword table.
///
/// Keywords match as substrings of the lowercased text. Returns the best
/// emotion and its confidence, or `None` when nothing matched.
pub fn score_text(text: &str) -> Option<(Emotion, f64)> {
    let lower = text.to_lowercase();

    let mut best: Option<(Emotion, usize)> = None;
    for (emotion, words) in KEYWORDS {
        let hits = words.iter().filter(|w| lower.contains(*w)).count();
        if hits > 0 && best.is_none_or(|(_, top)| hits > top) {
            best = Some((*emotion, hits));
        }
    }

    best.map(|(emotion, hits)| {
        let confidence = (hits as f64 * CONFIDENCE_PER_HIT).min(1.0);
        (emotion, confidence)
    })
}

/// Classifier that needs no backend; used for offline sessions
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify synchronously
    pub fn analyze(&self, text: &str) -> ClassifyResult<EmotionResult> {
        let text = require_text(text)?;
        let seed = text.bytes().map(usize::from).sum::<usize>();

        if text.chars().count() < MIN_TEXT_CHARS {
            return Ok(EmotionResult {
                emotion: Emotion::Calm,
                confidence: FALLBACK_CONFIDENCE,
                message: TOO_SHORT_MESSAGE.to_string(),
                session_id: None,
                suggestions: suggestions_for(Emotion::Calm, seed),
            });
        }

        let (emotion, confidence) =
            score_text(text).unwrap_or((Emotion::Calm, FALLBACK_CONFIDENCE));
        debug!(emotion = %emotion, confidence, "Keyword classification");

        Ok(EmotionResult {
            emotion,
            confidence,
            message: format!(
                "I detected that you're feeling {}. Here are some personalized suggestions to help you.",
                emotion
            ),
            session_id: None,
            suggestions: suggestions_for(emotion, seed),
        })
    }
}

#[async_trait]
impl EmotionClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> ClassifyResult<EmotionResult> {
        self.analyze(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClassificationError;

    #[test]
    fn scores_keyword_hits() {
        let (emotion, confidence) =
            score_text("I'm so stressed and anxious about the exam").unwrap();
        assert_eq!(emotion, Emotion::Stressed);
        assert!((confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn confidence_caps_at_one() {
        let (_, confidence) = score_text(
            "stressed anxious worried overwhelmed pressure panic nervous tense",
        )
        .unwrap();
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn ties_go_to_the_earlier_emotion() {
        let (emotion, _) = score_text("tired but happy").unwrap();
        assert_eq!(emotion, Emotion::Tired);
    }

    #[test]
    fn no_hits_is_none() {
        assert_eq!(score_text("the sky is blue today"), None);
    }

    #[test]
    fn unmatched_text_defaults_to_calm() {
        let result = KeywordClassifier::new().analyze("the sky is blue today").unwrap();
        assert_eq!(result.emotion, Emotion::Calm);
        assert_eq!(result.confidence, 0.5);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn short_text_asks_for_more() {
        let result = KeywordClassifier::new().analyze(" ok ").unwrap();
        assert_eq!(result.emotion, Emotion::Calm);
        assert_eq!(result.message, TOO_SHORT_MESSAGE);
        assert!(!result.suggestions.activities.is_empty());
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let result = KeywordClassifier::new().classify("  \n").await;
        assert!(matches!(result, Err(ClassificationError::Validation(_))));
    }

    #[tokio::test]
    async fn classify_returns_suggestions() {
        let result = KeywordClassifier::new()
            .classify("I feel exhausted and sleepy")
            .await
            .unwrap();
        assert_eq!(result.emotion, Emotion::Tired);
        assert_eq!(result.suggestions.activities[0].title, "Energizing Breath");
        assert!(result.session_id.is_none());
    }
}
