//! Config validation CLI tool
//!
//! Validates a respite configuration file and reports any errors.

use respite_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a respite configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-config {}", default_path.display());
            eprintln!("  validate-config config.example.toml");
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match respite_config::load_config(&config_path) {
        Ok(settings) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", respite_config::CURRENT_CONFIG_VERSION);
            println!(
                "  Backend: {} (timeout {}s)",
                settings.backend.base_url,
                settings.backend.timeout.as_secs()
            );
            if settings.persistence.enabled {
                println!("  Session mirror: {}", settings.persistence.base_url);
            } else {
                println!("  Session mirror: disabled");
            }
            match &settings.session.user_id {
                Some(user) => println!("  User: {}", user),
                None => println!("  User: none (sessions are not mirrored)"),
            }
            println!(
                "  Tick interval: {}ms",
                settings.session.tick_interval.as_millis()
            );

            // Only report whether keys are present, never their values
            println!();
            println!("API keys:");
            let present = |set: bool| if set { "set" } else { "missing" };
            println!(
                "  {}: {}",
                settings.generative.api_key_env,
                present(settings.generative.api_key().is_some())
            );
            println!(
                "  {}: {}",
                settings.transcription.api_key_env,
                present(settings.transcription.api_key().is_some())
            );

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                respite_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                respite_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                respite_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                respite_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        respite_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
