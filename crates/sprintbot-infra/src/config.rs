//! Configuration loader for the sprint bot.
//!
//! Reads `config.toml` from the data directory (`~/.sprintbot/` by default)
//! and deserializes it into [`SprintConfig`]. Falls back to defaults when the
//! file is missing, malformed, or describes impossible bounds.

use std::path::{Path, PathBuf};

use sprintbot_types::config::SprintConfig;

pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory.
///
/// `SPRINTBOT_DATA_DIR` wins, then `~/.sprintbot`, then `.sprintbot` in the
/// current directory.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SPRINTBOT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".sprintbot");
    }

    PathBuf::from(".sprintbot")
}

/// Load sprint configuration from `{data_dir}/config.toml`.
pub async fn load_sprint_config(data_dir: &Path) -> SprintConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return SprintConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return SprintConfig::default();
        }
    };

    parse_sprint_config(&content, &config_path)
}

fn parse_sprint_config(content: &str, origin: &Path) -> SprintConfig {
    let config = match toml::from_str::<SprintConfig>(content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", origin.display());
            return SprintConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => config,
        Err(reason) => {
            tracing::warn!("Invalid sprint settings in {}: {reason}, using defaults", origin.display());
            SprintConfig::default()
        }
    }
}
