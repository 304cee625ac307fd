//! Configuration types for the sprint bot.
//!
//! `SprintConfig` represents the `config.toml` that controls sprint bounds,
//! tick cadence and rendering. It is loaded once and handed to the sprint
//! service as a read-only snapshot.

use serde::{Deserialize, Serialize};

/// Tunables for sprints and their rendering.
///
/// Loaded from `~/.sprintbot/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintConfig {
    /// Shortest sprint that can be planned, in minutes.
    #[serde(default = "default_min_duration")]
    pub min_duration: u32,

    /// Longest sprint that can be planned, in minutes.
    #[serde(default = "default_max_duration")]
    pub max_duration: u32,

    /// Duration used when a command or repeat button omits it.
    #[serde(default = "default_duration")]
    pub default_duration: u32,

    /// Shortest delay before a sprint starts, in minutes.
    #[serde(default)]
    pub min_delay: u32,

    /// Longest delay before a sprint starts, in minutes.
    #[serde(default = "default_max_delay")]
    pub max_delay: u32,

    /// Delay used when a command or repeat button omits it.
    #[serde(default = "default_delay")]
    pub default_delay: u32,

    /// Period of the recurring sprint tick, in seconds.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,

    /// A running sprint finishes on the first tick with less than this many
    /// seconds left.
    #[serde(default = "default_finish_threshold_secs")]
    pub finish_threshold_secs: i64,

    /// Upper bound for a single transport call made while ticking.
    #[serde(default = "default_tick_timeout_secs")]
    pub tick_timeout_secs: u64,

    /// Offset from UTC used to print start/end clock times.
    #[serde(default)]
    pub display_utc_offset_minutes: i32,

    /// Width of the progress bar in characters.
    #[serde(default = "default_progress_bar_width")]
    pub progress_bar_width: usize,
}

fn default_min_duration() -> u32 {
    1
}

fn default_max_duration() -> u32 {
    120
}

fn default_duration() -> u32 {
    30
}

fn default_max_delay() -> u32 {
    60
}

fn default_delay() -> u32 {
    2
}

fn default_tick_interval_secs() -> u64 {
    60
}

fn default_finish_threshold_secs() -> i64 {
    30
}

fn default_tick_timeout_secs() -> u64 {
    10
}

fn default_progress_bar_width() -> usize {
    30
}

impl Default for SprintConfig {
    fn default() -> Self {
        Self {
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
            default_duration: default_duration(),
            min_delay: 0,
            max_delay: default_max_delay(),
            default_delay: default_delay(),
            tick_interval_secs: default_tick_interval_secs(),
            finish_threshold_secs: default_finish_threshold_secs(),
            tick_timeout_secs: default_tick_timeout_secs(),
            display_utc_offset_minutes: 0,
            progress_bar_width: default_progress_bar_width(),
        }
    }
}

impl SprintConfig {
    /// Check internal consistency. Returns a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_duration == 0 {
            return Err("min_duration must be at least 1".to_string());
        }
        if self.min_duration > self.max_duration {
            return Err(format!(
                "min_duration ({}) exceeds max_duration ({})",
                self.min_duration, self.max_duration
            ));
        }
        if self.min_delay > self.max_delay {
            return Err(format!(
                "min_delay ({}) exceeds max_delay ({})",
                self.min_delay, self.max_delay
            ));
        }
        if self.tick_interval_secs == 0 {
            return Err("tick_interval_secs must be positive".to_string());
        }
        if self.tick_timeout_secs == 0 {
            return Err("tick_timeout_secs must be positive".to_string());
        }
        if self.progress_bar_width == 0 {
            return Err("progress_bar_width must be positive".to_string());
        }
        if self.display_utc_offset_minutes.abs() >= 24 * 60 {
            return Err("display_utc_offset_minutes must be within one day".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprint_config_default_values() {
        let config = SprintConfig::default();
        assert_eq!(config.min_duration, 1);
        assert_eq!(config.max_duration, 120);
        assert_eq!(config.default_duration, 30);
        assert_eq!(config.default_delay, 2);
        assert_eq!(config.tick_interval_secs, 60);
        assert_eq!(config.progress_bar_width, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sprint_config_deserialize_with_defaults() {
        let config: SprintConfig = toml::from_str("").unwrap();
        assert_eq!(config, SprintConfig::default());
    }

    #[test]
    fn test_sprint_config_deserialize_with_values() {
        let toml_str = r#"
max_duration = 90
max_delay = 15
tick_interval_secs = 30
display_utc_offset_minutes = 180
"#;
        let config: SprintConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_duration, 90);
        assert_eq!(config.max_delay, 15);
        assert_eq!(config.tick_interval_secs, 30);
        assert_eq!(config.display_utc_offset_minutes, 180);
        assert_eq!(config.min_duration, 1);
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let config = SprintConfig {
            min_duration: 10,
            max_duration: 5,
            ..SprintConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("min_duration"));
    }

    #[test]
    fn test_validate_rejects_zero_tick_interval() {
        let config = SprintConfig {
            tick_interval_secs: 0,
            ..SprintConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
