//! respite - emotion-aware study breaks in the terminal
//!
//! Wires together:
//! - Configuration loading
//! - Emotion classification (backend or offline keywords)
//! - The break session controller and its session mirror
//! - Optional speech input from a recorded file
//! - One-shot study helpers (summaries, quizzes, questions, transcripts)

mod app;
mod repl;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use respite_client::{
    EmotionClassifier, GenerativeTextClient, HttpEmotionClassifier, KeywordClassifier,
    TranscriptionClient, TranscriptionSpeechEngine,
};
use respite_config::{load_or_default, Settings};
use respite_core::BreakController;
use respite_host_api::SpeechCapture;
use respite_store::{HttpSessionStore, SessionStore};
use respite_util::{default_config_path, UserId};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::BreakApp;

/// respite - Take a short, mood-matched break from studying
#[derive(Parser, Debug)]
#[command(name = "respite")]
#[command(about = "Emotion-aware study breaks and study helpers", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/respite/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Backend base URL override (or set RESPITE_BACKEND_URL env var)
    #[arg(short, long, env = "RESPITE_BACKEND_URL")]
    backend_url: Option<String>,

    /// User identifier used when ending sessions (or set RESPITE_USER env var)
    #[arg(short, long, env = "RESPITE_USER")]
    user: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check in and take a break
    Break {
        /// Classify locally with keywords and skip the session mirror
        #[arg(long)]
        offline: bool,

        /// Transcribe this recording as the check-in instead of typing
        #[arg(long)]
        audio: Option<PathBuf>,
    },

    /// Summarize study notes (reads stdin when no text is given)
    Summarize { text: Option<String> },

    /// Generate quiz questions from study notes (reads stdin when no text is given)
    Quiz { text: Option<String> },

    /// Ask a study question (reads stdin when no text is given)
    Ask { question: Option<String> },

    /// Transcribe an audio file
    Transcribe { file: PathBuf },
}

fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout belongs to the session
    if args.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = load_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    if let Some(url) = &args.backend_url {
        respite_config::check_http_url(url)
            .map_err(|e| anyhow::anyhow!("Invalid --backend-url: {}", e))?;
        if settings.persistence.base_url == settings.backend.base_url {
            settings.persistence.base_url = url.clone();
        }
        settings.backend.base_url = url.clone();
    }

    if let Some(user) = args.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        settings.session.user_id = Some(UserId::new(user));
    }

    info!(
        config_path = %args.config.display(),
        backend = %settings.backend.base_url,
        persistence = settings.persistence.enabled,
        has_user = settings.session.user_id.is_some(),
        "Configuration loaded"
    );

    Ok(settings)
}

/// Use the argument, or all of stdin when it is absent
fn text_or_stdin(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn generative_client(settings: &Settings) -> Result<GenerativeTextClient> {
    let key = settings.generative.api_key().with_context(|| {
        format!(
            "Generative text is not configured: set {}",
            settings.generative.api_key_env
        )
    })?;
    Ok(GenerativeTextClient::new(
        &settings.generative.endpoint,
        key,
        settings.backend.timeout,
    )?)
}

fn transcription_client(settings: &Settings) -> Result<TranscriptionClient> {
    let key = settings.transcription.api_key().with_context(|| {
        format!(
            "Transcription is not configured: set {}",
            settings.transcription.api_key_env
        )
    })?;
    Ok(TranscriptionClient::new(
        &settings.transcription.endpoint,
        settings.transcription.model.clone(),
        key,
        settings.backend.timeout,
    )?)
}

async fn run_break(settings: &Settings, offline: bool, audio: Option<PathBuf>) -> Result<()> {
    let classifier: Arc<dyn EmotionClassifier> = if offline {
        Arc::new(KeywordClassifier::new())
    } else {
        Arc::new(
            HttpEmotionClassifier::new(&settings.backend.base_url, settings.backend.timeout)
                .context("Failed to create emotion classifier")?,
        )
    };

    let store: Option<Arc<dyn SessionStore>> = if offline || !settings.persistence.enabled {
        None
    } else {
        let store = HttpSessionStore::new(
            &settings.persistence.base_url,
            settings.persistence.timeout,
        )
        .context("Failed to create session store")?;
        Some(Arc::new(store))
    };

    if store.is_some() && settings.session.user_id.is_none() {
        warn!("No user configured; sessions will not be ended remotely");
    }

    let capture = match audio {
        Some(path) => {
            let engine = TranscriptionSpeechEngine::new(transcription_client(settings)?, path);
            Some(SpeechCapture::new(Arc::new(engine)))
        }
        None => None,
    };

    let controller = BreakController::new(
        store,
        settings.session.user_id.clone(),
        settings.session.tick_interval,
    );

    info!(offline, speech = capture.is_some(), "Break mode starting");
    BreakApp::new(controller, classifier, capture).run().await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    info!(version = env!("CARGO_PKG_VERSION"), "respite starting");

    let settings = load_settings(&args)?;

    match args.command {
        Command::Break { offline, audio } => run_break(&settings, offline, audio).await?,
        Command::Summarize { text } => {
            let text = text_or_stdin(text)?;
            let summary = generative_client(&settings)?.summarize(&text).await?;
            println!("{}", summary);
        }
        Command::Quiz { text } => {
            let text = text_or_stdin(text)?;
            let quiz = generative_client(&settings)?.quiz(&text).await?;
            println!("{}", quiz);
        }
        Command::Ask { question } => {
            let question = text_or_stdin(question)?;
            let answer = generative_client(&settings)?.ask(&question).await?;
            println!("{}", answer);
        }
        Command::Transcribe { file } => {
            let text = transcription_client(&settings)?
                .transcribe(&file)
                .await
                .with_context(|| format!("Failed to transcribe {:?}", file))?;
            println!("{}", text);
        }
    }

    Ok(())
}
