//! Default paths for respite
//!
//! Paths are user-writable by default:
//! - Config: `$XDG_CONFIG_HOME/respite/config.toml` or `~/.config/respite/config.toml`
//! - Data: `$XDG_DATA_HOME/respite` or `~/.local/share/respite`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const RESPITE_CONFIG_ENV: &str = "RESPITE_CONFIG";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "respite";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$RESPITE_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/respite/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/respite/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(RESPITE_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    config_dir().join(CONFIG_FILENAME)
}

/// Get the config directory without checking `RESPITE_CONFIG`.
pub fn config_dir() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("config")
}

/// Get the default data directory (audio scratch files, exports).
pub fn default_data_dir() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    PathBuf::from("/tmp").join(APP_DIR).join("data")
}
