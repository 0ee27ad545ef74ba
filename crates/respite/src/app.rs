//! Interactive break session loop

use anyhow::{Context, Result};
use respite_api::{BreakStatus, SessionPhase};
use respite_client::EmotionClassifier;
use respite_core::{BreakController, CoreEvent};
use respite_host_api::{CaptureError, CaptureEvent, SpeechCapture};
use respite_util::format_countdown;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::repl::{ReplCommand, HELP};

const CHECK_IN_PROMPT: &str = "How are you feeling right now? Type a few words (or 'help').";

/// How long leaving waits for the session end to reach the backend
const EXIT_GRACE: Duration = Duration::from_secs(3);

/// Whether the loop should keep going after handling input
enum Flow {
    Continue,
    Quit,
}

pub struct BreakApp {
    controller: BreakController,
    classifier: Arc<dyn EmotionClassifier>,
    capture: Option<(SpeechCapture, mpsc::UnboundedReceiver<CaptureEvent>)>,
}

impl BreakApp {
    pub fn new(
        controller: BreakController,
        classifier: Arc<dyn EmotionClassifier>,
        capture: Option<(SpeechCapture, mpsc::UnboundedReceiver<CaptureEvent>)>,
    ) -> Self {
        Self {
            controller,
            classifier,
            capture,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let (capture, mut capture_events) = match self.capture.take() {
            Some((capture, rx)) => (Some(capture), Some(rx)),
            None => (None, None),
        };

        println!("{}", CHECK_IN_PROMPT);
        if let Some(capture) = &capture {
            match capture.start_capture().await {
                Ok(()) => println!("Listening to your recording..."),
                Err(CaptureError::Unsupported) => {
                    println!("Speech input is not available here; please type instead.")
                }
                Err(e) => println!("{}; please type instead.", e),
            }
        }

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, leaving break mode");
                    break;
                }

                line = lines.next_line() => {
                    let line = line.context("Failed to read from stdin")?;
                    let Some(line) = line else {
                        debug!("stdin closed");
                        break;
                    };
                    if let Flow::Quit = self.handle_line(&line).await {
                        break;
                    }
                }

                Some(message) = self.controller.next_message() => {
                    let events = self.controller.handle_message(message);
                    self.render_events(&events);
                }

                Some(event) = recv_capture(&mut capture_events) => {
                    match event {
                        CaptureEvent::Transcript(text) => {
                            println!("You said: \"{}\"", text);
                            self.check_in(&text).await;
                        }
                        CaptureEvent::Failed(e) => {
                            println!("{}. Please type how you feel instead.", e);
                        }
                    }
                }
            }
        }

        if let Some(capture) = &capture {
            capture.stop_capture().await;
        }

        self.finish().await;
        Ok(())
    }

    /// End an open session on the way out so the remote record is finalized
    async fn finish(&mut self) {
        let (done, total) = self.controller.status().completed_count();

        if self.controller.engine().phase() != SessionPhase::Idle {
            self.controller.request_new_check(None);
            if !self.controller.settle(EXIT_GRACE).await {
                warn!("Leaving before the session end was confirmed");
            }
        }

        if total > 0 {
            println!("You completed {} of {} activities. Take care!", done, total);
        }
    }

    async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match ReplCommand::parse(line) {
            None => return Flow::Continue,
            Some(Err(usage)) => {
                println!("{}", usage);
                return Flow::Continue;
            }
            Some(Ok(command)) => command,
        };

        let outcome = match command {
            ReplCommand::Quit => return Flow::Quit,
            ReplCommand::Help => {
                println!("{}", HELP);
                return Flow::Continue;
            }
            ReplCommand::Status => {
                print_status(&self.controller.status());
                return Flow::Continue;
            }
            ReplCommand::Text(text) => {
                if self.controller.engine().phase() == SessionPhase::Idle {
                    self.check_in(&text).await;
                } else {
                    println!("Unknown command. Type 'help', or 'new' to check in again.");
                }
                return Flow::Continue;
            }
            ReplCommand::Start(kind) => self.controller.start_activity(&kind),
            ReplCommand::Done(kind) => self.controller.complete_activity(&kind),
            ReplCommand::Stop => Ok(self.controller.stop_activity()),
            ReplCommand::New(mood) => Ok(self.controller.request_new_check(mood.as_deref())),
        };

        match outcome {
            Ok(events) => self.render_events(&events),
            Err(e) => println!("{}", e),
        }
        Flow::Continue
    }

    async fn check_in(&mut self, text: &str) {
        println!("Analyzing...");
        let result = match self.classifier.classify(text).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Emotion classification failed");
                println!("Could not analyze that: {}. Please try again.", e);
                return;
            }
        };

        match self.controller.receive_emotion_result(result) {
            Ok(events) => self.render_events(&events),
            Err(e) => println!("{}", e),
        }
    }

    fn render_events(&self, events: &[CoreEvent]) {
        for event in events {
            match event {
                CoreEvent::SessionStarted { .. } => print_status(&self.controller.status()),
                CoreEvent::ActivityStarted { kind, seconds, .. } => {
                    println!("▶ {} started: {}", kind, format_countdown(*seconds));
                }
                CoreEvent::CountdownTick {
                    kind,
                    remaining_seconds,
                    ..
                } => {
                    if *remaining_seconds > 0
                        && (remaining_seconds % 60 == 0 || *remaining_seconds <= 5)
                    {
                        println!("  {} {} left", kind, format_countdown(*remaining_seconds));
                    }
                }
                CoreEvent::ActivityStopped { kind, .. } => println!("■ {} stopped", kind),
                CoreEvent::ActivityCompleted {
                    kind, automatic, ..
                } => {
                    let status = self.controller.status();
                    let (done, total) = status.completed_count();
                    if *automatic {
                        println!("✓ Time's up! {} completed ({} of {} done)", kind, done, total);
                    } else {
                        println!("✓ {} completed ({} of {} done)", kind, done, total);
                    }
                }
                CoreEvent::SessionEnded {
                    completed, total, ..
                } => {
                    println!("Break finished: {} of {} activities done.", completed, total);
                }
                CoreEvent::SessionReset { .. } => {
                    println!();
                    println!("{}", CHECK_IN_PROMPT);
                }
                CoreEvent::Persist(_) => {}
            }
        }
    }
}

async fn recv_capture(
    rx: &mut Option<mpsc::UnboundedReceiver<CaptureEvent>>,
) -> Option<CaptureEvent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Render the whole session
pub fn print_status(status: &BreakStatus) {
    let Some(emotion) = status.emotion else {
        println!("No break in progress. {}", CHECK_IN_PROMPT);
        return;
    };

    println!();
    println!(
        "Feeling: {} ({:.0}% confidence)",
        emotion,
        status.confidence.unwrap_or_default() * 100.0
    );
    if let Some(message) = status.message.as_deref().filter(|m| !m.is_empty()) {
        println!("{}", message);
    }
    if let Some(affirmation) = status.affirmation.as_deref().filter(|a| !a.is_empty()) {
        println!("“{}”", affirmation);
    }

    println!();
    for view in &status.activities {
        let mark = if view.running {
            "▶"
        } else if view.completed {
            "✓"
        } else {
            " "
        };
        let activity = &view.activity;
        println!(
            "[{}] {} ({}, {})",
            mark, activity.title, activity.kind, activity.duration
        );
        if !activity.description.is_empty() {
            println!("      {}", activity.description);
        }
        for (i, step) in activity.instructions.iter().enumerate() {
            println!("      {}. {}", i + 1, step);
        }
    }

    let (done, total) = status.completed_count();
    println!();
    println!(
        "Progress: {} of {} ({:.0}%)",
        done,
        total,
        status.progress * 100.0
    );
    if let Some(active) = &status.active {
        println!("Running: {} ({} left)", active, status.remaining_display());
    }
    if status.mirror.failures > 0 {
        println!(
            "Note: progress could not be saved online ({} failed attempts)",
            status.mirror.failures
        );
    }
    println!("Type 'start <type>' to begin an activity, or 'help'.");
}
