//! Core data types for the countdown timer.
//!
//! This module defines the data structures used for:
//! - Countdown status
//! - Presets and the preset catalog
//! - Timer configuration with validation
//! - Observable snapshots handed to front-ends

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time;

// ============================================================================
// CountdownStatus
// ============================================================================

/// Lifecycle status of the countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownStatus {
    /// Nothing is counting down
    #[default]
    Idle,
    /// The engine is ticking
    Running,
    /// Stopped mid-run, remaining time kept
    Paused,
    /// The last run reached zero
    Completed,
}

impl CountdownStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            CountdownStatus::Idle => "idle",
            CountdownStatus::Running => "running",
            CountdownStatus::Paused => "paused",
            CountdownStatus::Completed => "completed",
        }
    }

    /// Returns true while a run is in progress (running or paused).
    pub fn is_active(&self) -> bool {
        matches!(self, CountdownStatus::Running | CountdownStatus::Paused)
    }
}

// ============================================================================
// PresetDuration
// ============================================================================

/// A named, fixed duration the user can apply instead of typing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetDuration {
    /// Label shown to the user
    pub label: String,
    /// Duration in seconds
    pub seconds: u64,
}

impl PresetDuration {
    /// Creates a preset.
    pub fn new(label: impl Into<String>, seconds: u64) -> Self {
        Self {
            label: label.into(),
            seconds,
        }
    }

    /// Creates a preset lasting a whole number of minutes.
    pub fn minutes(label: impl Into<String>, minutes: u64) -> Self {
        Self::new(label, Duration::from_secs(minutes * 60).as_secs())
    }

    /// Whole hours of the duration.
    pub fn hours(&self) -> u64 {
        time::hours_part(self.seconds)
    }

    /// Minutes of the duration after whole hours.
    pub fn minutes_part(&self) -> u64 {
        time::minutes_part(self.seconds)
    }

    /// Seconds of the duration after whole minutes.
    pub fn seconds_part(&self) -> u64 {
        time::seconds_part(self.seconds)
    }
}

impl std::fmt::Display for PresetDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

// ============================================================================
// PresetCatalog
// ============================================================================

/// Ordered list of presets loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetCatalog {
    presets: Vec<PresetDuration>,
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self {
            presets: vec![
                PresetDuration::minutes("番茄钟 25 分钟", 25),
                PresetDuration::minutes("短休息 5 分钟", 5),
                PresetDuration::minutes("长休息 15 分钟", 15),
                PresetDuration::minutes("晨练 45 分钟", 45),
                PresetDuration::minutes("深度工作 90 分钟", 90),
            ],
        }
    }
}

impl PresetCatalog {
    /// Builds a catalog from presets, validating each one.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or a preset has an empty label
    /// or a duration of zero or above [`time::MAX_SECONDS`].
    pub fn new(presets: Vec<PresetDuration>) -> Result<Self, ConfigError> {
        if presets.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for preset in &presets {
            if preset.label.trim().is_empty() {
                return Err(ConfigError::InvalidPreset(
                    "预设名称不能为空".to_string(),
                ));
            }
            if preset.seconds == 0 {
                return Err(ConfigError::InvalidPreset(format!(
                    "{}: 时长必须至少为 1 秒",
                    preset.label
                )));
            }
            if preset.seconds > time::MAX_SECONDS {
                return Err(ConfigError::InvalidPreset(format!(
                    "{}: 时长不能超过 {} 秒",
                    preset.label,
                    time::MAX_SECONDS
                )));
            }
        }
        Ok(Self { presets })
    }

    /// Parses a catalog from a JSON array of `{label, seconds}` objects.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON or an invalid preset.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let presets: Vec<PresetDuration> = serde_json::from_str(json)?;
        Self::new(presets)
    }

    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// Finds a preset by its exact label.
    pub fn find(&self, label: &str) -> Option<&PresetDuration> {
        self.presets.iter().find(|p| p.label == label)
    }

    /// Returns all presets in catalog order.
    pub fn presets(&self) -> &[PresetDuration] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

// ============================================================================
// CountdownConfig
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The tick interval is zero.
    #[error("计时间隔必须大于 0")]
    ZeroInterval,

    /// A preset catalog contains no presets.
    #[error("预设列表为空")]
    EmptyCatalog,

    /// A preset entry is invalid.
    #[error("无效的预设: {0}")]
    InvalidPreset(String),

    /// The preset file could not be read.
    #[error("无法读取预设文件: {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preset file is not valid JSON.
    #[error("预设文件格式错误: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Default seconds at or below which an active countdown is critical.
pub const DEFAULT_CRITICAL_THRESHOLD_SECONDS: u64 = 60;

/// Configuration for the countdown timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Time between ticks; one second outside tests and demos
    pub tick_interval: Duration,
    /// Remaining seconds at or below which the countdown is critical
    pub critical_threshold_seconds: u64,
    /// Whether the completion chime is played
    pub sound_enabled: bool,
    /// Preset file to load instead of the built-in catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presets_path: Option<PathBuf>,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            critical_threshold_seconds: DEFAULT_CRITICAL_THRESHOLD_SECONDS,
            sound_enabled: true,
            presets_path: None,
        }
    }
}

impl CountdownConfig {
    /// Sets the tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Enables or disables the completion chime.
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Sets the preset file path.
    pub fn with_presets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.presets_path = Some(path.into());
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick interval is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    /// Default location of the user preset file, if a config directory exists.
    pub fn default_presets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("countdown").join("presets.json"))
    }

    /// Loads the preset catalog this configuration points at.
    ///
    /// An explicit path must load successfully. Without one, the default
    /// location is used if the file exists, otherwise the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if a preset file exists but cannot be loaded.
    pub fn load_presets(&self) -> Result<PresetCatalog, ConfigError> {
        if let Some(path) = &self.presets_path {
            return PresetCatalog::load(path);
        }
        match Self::default_presets_path() {
            Some(path) if path.exists() => PresetCatalog::load(&path),
            _ => Ok(PresetCatalog::default()),
        }
    }
}

// ============================================================================
// CountdownSnapshot
// ============================================================================

/// Observable presentation state of the countdown.
///
/// Front-ends render this; they never reach into the view-model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub status: CountdownStatus,
    #[serde(rename = "initialSeconds")]
    pub initial_seconds: u64,
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u64,
    #[serde(rename = "formattedTime")]
    pub formatted_time: String,
    /// Consumed fraction in `[0, 1]`
    pub progress: f64,
    pub critical: bool,
    pub running: bool,
    #[serde(rename = "allowEdits")]
    pub allow_edits: bool,
    #[serde(rename = "statusMessage")]
    pub status_message: String,
    #[serde(rename = "finishTimeText")]
    pub finish_time_text: String,
    #[serde(rename = "activePreset", skip_serializing_if = "Option::is_none")]
    pub active_preset: Option<PresetDuration>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod countdown_status_tests {
        use super::*;

        #[test]
        fn test_default_is_idle() {
            assert_eq!(CountdownStatus::default(), CountdownStatus::Idle);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(CountdownStatus::Idle.as_str(), "idle");
            assert_eq!(CountdownStatus::Running.as_str(), "running");
            assert_eq!(CountdownStatus::Paused.as_str(), "paused");
            assert_eq!(CountdownStatus::Completed.as_str(), "completed");
        }

        #[test]
        fn test_is_active() {
            assert!(!CountdownStatus::Idle.is_active());
            assert!(CountdownStatus::Running.is_active());
            assert!(CountdownStatus::Paused.is_active());
            assert!(!CountdownStatus::Completed.is_active());
        }

        #[test]
        fn test_serialize() {
            let json = serde_json::to_string(&CountdownStatus::Completed).unwrap();
            assert_eq!(json, "\"completed\"");
        }
    }

    mod preset_tests {
        use super::*;

        #[test]
        fn test_minutes_constructor() {
            let preset = PresetDuration::minutes("Tea", 3);
            assert_eq!(preset.seconds, 180);
        }

        #[test]
        fn test_parts() {
            let preset = PresetDuration::new("Deep", 5415);
            assert_eq!(preset.hours(), 1);
            assert_eq!(preset.minutes_part(), 30);
            assert_eq!(preset.seconds_part(), 15);
        }

        #[test]
        fn test_display_is_label() {
            let preset = PresetDuration::minutes("短休息 5 分钟", 5);
            assert_eq!(preset.to_string(), "短休息 5 分钟");
        }
    }

    mod catalog_tests {
        use super::*;

        #[test]
        fn test_default_catalog() {
            let catalog = PresetCatalog::default();
            let seconds: Vec<u64> = catalog.presets().iter().map(|p| p.seconds).collect();
            assert_eq!(seconds, vec![1500, 300, 900, 2700, 5400]);
        }

        #[test]
        fn test_find_by_label() {
            let catalog = PresetCatalog::default();
            let preset = catalog.find("番茄钟 25 分钟").unwrap();
            assert_eq!(preset.seconds, 1500);
            assert!(catalog.find("missing").is_none());
        }

        #[test]
        fn test_from_json() {
            let catalog =
                PresetCatalog::from_json(r#"[{"label": "Eggs", "seconds": 420}]"#).unwrap();
            assert_eq!(catalog.len(), 1);
            assert_eq!(catalog.find("Eggs").unwrap().seconds, 420);
        }

        #[test]
        fn test_rejects_empty_catalog() {
            let result = PresetCatalog::from_json("[]");
            assert!(matches!(result, Err(ConfigError::EmptyCatalog)));
        }

        #[test]
        fn test_rejects_zero_duration() {
            let result = PresetCatalog::from_json(r#"[{"label": "Zero", "seconds": 0}]"#);
            assert!(matches!(result, Err(ConfigError::InvalidPreset(_))));
        }

        #[test]
        fn test_rejects_oversized_duration() {
            let result = PresetCatalog::from_json(
                r#"[{"label": "Forever", "seconds": 18446744073709551615}]"#,
            );
            match result {
                Err(ConfigError::InvalidPreset(message)) => assert!(message.contains("Forever")),
                other => panic!("Expected InvalidPreset, got {:?}", other),
            }
        }

        #[test]
        fn test_accepts_largest_duration() {
            let catalog =
                PresetCatalog::new(vec![PresetDuration::new("Long", time::MAX_SECONDS)]).unwrap();
            assert_eq!(catalog.presets()[0].seconds, time::MAX_SECONDS);
        }

        #[test]
        fn test_rejects_blank_label() {
            let result = PresetCatalog::from_json(r#"[{"label": "  ", "seconds": 10}]"#);
            assert!(matches!(result, Err(ConfigError::InvalidPreset(_))));
        }

        #[test]
        fn test_rejects_malformed_json() {
            let result = PresetCatalog::from_json("{not json");
            assert!(matches!(result, Err(ConfigError::Parse(_))));
        }

        #[test]
        fn test_load_missing_file() {
            let result = PresetCatalog::load(Path::new("/nonexistent/presets.json"));
            assert!(matches!(result, Err(ConfigError::Read { .. })));
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_default_config() {
            let config = CountdownConfig::default();
            assert_eq!(config.tick_interval, Duration::from_secs(1));
            assert_eq!(config.critical_threshold_seconds, 60);
            assert!(config.sound_enabled);
            assert!(config.presets_path.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_builder_methods() {
            let config = CountdownConfig::default()
                .with_tick_interval(Duration::from_millis(10))
                .with_sound(false)
                .with_presets_path("/tmp/presets.json");
            assert_eq!(config.tick_interval, Duration::from_millis(10));
            assert!(!config.sound_enabled);
            assert_eq!(config.presets_path, Some(PathBuf::from("/tmp/presets.json")));
        }

        #[test]
        fn test_zero_interval_is_invalid() {
            let config = CountdownConfig::default().with_tick_interval(Duration::ZERO);
            assert!(matches!(config.validate(), Err(ConfigError::ZeroInterval)));
        }

        #[test]
        fn test_explicit_presets_path_must_exist() {
            let config = CountdownConfig::default().with_presets_path("/nonexistent/p.json");
            assert!(config.load_presets().is_err());
        }
    }
}
