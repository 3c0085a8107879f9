//! Configuration loaded from `config.toml`.

use crate::models::Schedule;
use crate::models::review_state::Millis;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const APP_NAME: &str = "linkdeck";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Could not write config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub learn: LearnConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Reads the config at `path`, or the default location when `None`.
    /// A missing or broken file yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::config_path) else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::read(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Using default config, {} is unusable: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME).map(|d| d.config_dir().join("config.toml"))
    }

    /// Store location: configured path, else the platform data dir.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage.path.clone().or_else(|| {
            directories::ProjectDirs::from("", "", APP_NAME)
                .map(|d| d.data_dir().join("progress.sqlite3"))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes until the next review after reaching score 1..=5.
    #[serde(default = "default_intervals")]
    pub intervals_minutes: [i64; 5],
    #[serde(default = "default_incorrect_interval")]
    pub incorrect_interval_secs: i64,
}

fn default_intervals() -> [i64; 5] {
    [5, 30, 24 * 60, 3 * 24 * 60, 7 * 24 * 60]
}
fn default_incorrect_interval() -> i64 {
    60
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            intervals_minutes: default_intervals(),
            incorrect_interval_secs: default_incorrect_interval(),
        }
    }
}

impl ScheduleConfig {
    pub fn to_schedule(&self) -> Schedule {
        let minute: Millis = 60 * 1000;
        Schedule {
            intervals: self.intervals_minutes.map(|m| m.max(0).saturating_mul(minute)),
            incorrect_interval: self.incorrect_interval_secs.max(0).saturating_mul(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnConfig {
    #[serde(default = "default_min_cards")]
    pub min_cards: usize,
    #[serde(default = "default_option_count")]
    pub option_count: usize,
    #[serde(default = "default_feedback_delay")]
    pub feedback_delay_ms: u64,
}

fn default_min_cards() -> usize {
    4
}
fn default_option_count() -> usize {
    4
}
fn default_feedback_delay() -> u64 {
    2000
}

impl Default for LearnConfig {
    fn default() -> Self {
        Self {
            min_cards: default_min_cards(),
            option_count: default_option_count(),
            feedback_delay_ms: default_feedback_delay(),
        }
    }
}

impl LearnConfig {
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_fade")]
    pub fade_ms: u64,
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
}

fn default_fade() -> u64 {
    200
}
fn default_share_base_url() -> String {
    "https://linkdeck.app/".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fade_ms: default_fade(),
            share_base_url: default_share_base_url(),
        }
    }
}

impl DisplayConfig {
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_matches_scheduler() {
        assert_eq!(ScheduleConfig::default().to_schedule(), Schedule::default());
    }

    #[test]
    fn test_huge_intervals_saturate() {
        let config = ScheduleConfig {
            intervals_minutes: [i64::MAX, 1, 1, 1, -5],
            incorrect_interval_secs: i64::MAX,
        };
        let schedule = config.to_schedule();
        assert_eq!(schedule.intervals[0], i64::MAX);
        assert_eq!(schedule.intervals[4], 0);
        assert_eq!(schedule.incorrect_interval, i64::MAX);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [learn]
            feedback_delay_ms = 500

            [schedule]
            incorrect_interval_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.learn.feedback_delay_ms, 500);
        assert_eq!(config.learn.min_cards, 4);
        assert_eq!(config.schedule.to_schedule().incorrect_interval, 30_000);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_save_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.display.share_base_url = "https://cards.example/".to_string();
        config.save(&path).unwrap();

        assert_eq!(Config::read(&path).unwrap(), config);
        assert_eq!(Config::load(Some(&path)), config);
    }

    #[test]
    fn test_broken_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "learn = [").unwrap();

        assert!(Config::read(&path).is_err());
        assert_eq!(Config::load(Some(&path)), Config::default());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert_eq!(Config::load(Some(&path)), Config::default());
    }

    #[test]
    fn test_configured_storage_path() {
        let mut config = Config::default();
        config.storage.path = Some(PathBuf::from("/tmp/cards.sqlite3"));
        assert_eq!(config.storage_path(), Some(PathBuf::from("/tmp/cards.sqlite3")));
    }
}
