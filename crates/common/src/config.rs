//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HoldwatchError, HoldwatchResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default analysis thresholds.
    pub analysis: AnalysisDefaults,

    /// Where and whether reports are written.
    pub output: OutputDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default analysis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Minimum detector confidence for a device box to be kept.
    pub phone_confidence_threshold: f64,

    /// Minimum detector confidence for a hand to be kept.
    pub hand_confidence_threshold: f64,

    /// Maximum device-to-hand center distance (pixels) for a device to count as held.
    pub distance_threshold_px: f64,

    /// Number of recent position samples used for motion detection.
    pub min_motion_frames: usize,

    /// Average per-frame displacement (pixels) above which the device is moving.
    pub motion_threshold: f64,

    /// Inactivity window unit for the temporal filter.
    pub max_inactive_frames: usize,

    /// Time base used by the hold timer.
    pub timer_clock: TimerClock,
}

/// Time base for hold-duration measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimerClock {
    /// Video presentation time derived from frame timestamps.
    #[default]
    Video,
    /// Monotonic processing wall-clock time.
    Wall,
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputDefaults {
    /// Directory reports are written to.
    pub dir: PathBuf,

    /// Report file name inside `dir`.
    pub report_file: String,

    /// Whether a report is written at all.
    pub generate_report: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "holdwatch=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisDefaults::default(),
            output: OutputDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            phone_confidence_threshold: 0.5,
            hand_confidence_threshold: 0.7,
            distance_threshold_px: 200.0,
            min_motion_frames: 3,
            motion_threshold: 5.0,
            max_inactive_frames: 10,
            timer_clock: TimerClock::Video,
        }
    }
}

impl Default for OutputDefaults {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            report_file: "phone_usage_report.json".to_string(),
            generate_report: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl OutputDefaults {
    /// Full path of the report file.
    pub fn report_path(&self) -> PathBuf {
        self.dir.join(&self.report_file)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Missing fields take their defaults.
    pub fn load_from(path: impl AsRef<Path>) -> HoldwatchResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HoldwatchError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> HoldwatchResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> HoldwatchResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("holdwatch").join("config.json")
}
