//! End-to-end tests for an offline break: check-in, activities, new check

use respite_api::{ActivityType, Emotion, SessionPhase};
use respite_client::{EmotionClassifier, KeywordClassifier};
use respite_config::parse_config;
use respite_core::{BreakController, CoreEvent};
use respite_host_api::{CaptureEvent, MockSpeechEngine, SpeechCapture};
use respite_store::{MemoryStore, StoreCall};
use respite_util::UserId;
use std::sync::Arc;
use std::time::Duration;

const CONFIG: &str = r#"
config_version = 1

[backend]
base_url = "http://localhost:5000"

[session]
user_id = "student-1"
tick_interval_ms = 1000
"#;

#[tokio::test(start_paused = true)]
async fn test_spoken_check_in_to_new_check() {
    let settings = parse_config(CONFIG).unwrap();
    assert_eq!(settings.persistence.base_url, "http://localhost:5000");

    let engine = Arc::new(MockSpeechEngine::new());
    engine.push_transcript("I have so many deadlines, I'm overwhelmed");
    let (capture, mut capture_rx) = SpeechCapture::new(engine);
    capture.start_capture().await.unwrap();

    let text = match capture_rx.recv().await {
        Some(CaptureEvent::Transcript(text)) => text,
        other => panic!("unexpected capture outcome {:?}", other),
    };

    let result = KeywordClassifier::new().classify(&text).await.unwrap();
    assert_eq!(result.emotion, Emotion::Stressed);
    // The offline classifier has no backend session to mirror
    assert!(result.session_id.is_none());

    let store = Arc::new(MemoryStore::new());
    let mut controller = BreakController::new(
        Some(store.clone()),
        settings.session.user_id.clone(),
        settings.session.tick_interval,
    );

    let events = controller.receive_emotion_result(result).unwrap();
    assert!(matches!(events[0], CoreEvent::SessionStarted { .. }));

    let status = controller.status();
    assert_eq!(status.phase, SessionPhase::Suggesting);
    assert!(!status.activities.is_empty());

    let first = status.activities[0].activity.kind.clone();
    controller.start_activity(&first).unwrap();
    for _ in 0..5 {
        controller.pump().await;
    }
    controller.complete_activity(&first).unwrap();

    let status = controller.status();
    assert_eq!(status.phase, SessionPhase::Suggesting);
    assert_eq!(status.completed_count().0, 1);
    assert!(!controller.countdown_active());

    controller.request_new_check(Some("  relaxed "));
    assert_eq!(controller.engine().phase(), SessionPhase::Idle);

    // Without a backend session id nothing is mirrored
    tokio::time::advance(Duration::from_secs(5)).await;
    assert!(store.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_backend_session_is_ended_once() {
    let mut result = KeywordClassifier::new()
        .analyze("so tired and sleepy today")
        .unwrap();
    assert_eq!(result.emotion, Emotion::Tired);
    result.session_id = Some("session-9".into());

    let store = Arc::new(MemoryStore::new());
    let mut controller = BreakController::new(
        Some(store.clone()),
        Some(UserId::new("student-1")),
        Duration::from_secs(1),
    );
    controller.receive_emotion_result(result).unwrap();

    let kind = controller.status().activities[0].activity.kind.clone();
    controller.complete_activity(&kind).unwrap();
    controller.pump().await;
    assert_eq!(controller.mirror().failures, 0);

    controller.request_new_check(None);
    controller.pump().await;

    let ends = store.end_calls();
    assert_eq!(ends.len(), 1);
    assert!(matches!(
        &ends[0],
        StoreCall::End { final_mood: None, .. }
    ));
    assert_eq!(store.update_calls().len(), 1);
}

#[tokio::test]
async fn test_unknown_activity_is_rejected_without_side_effects() {
    let result = KeywordClassifier::new().analyze("I feel happy and great").unwrap();
    let mut controller = BreakController::new(None, None, Duration::from_secs(1));
    controller.receive_emotion_result(result).unwrap();
    let before = controller.status();

    assert!(controller
        .start_activity(&ActivityType::from("juggling"))
        .is_err());
    assert_eq!(controller.status(), before);
    assert!(!controller.countdown_active());
}
