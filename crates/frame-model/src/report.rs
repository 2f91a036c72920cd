//! The usage report document written at the end of an analysis run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::record::{percentage, FrameRecord, UsageSession, UsageStatistics, UsageSummary};

/// Persisted analysis results for one video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReport {
    /// Schema version.
    pub version: String,

    /// Source video (or detection stream) the report describes.
    pub video_path: String,

    /// Where annotated output was written, if anywhere.
    #[serde(default)]
    pub output_path: Option<String>,

    /// When the report was generated (ISO 8601).
    pub processing_time: String,

    pub total_frames: u64,
    pub active_phone_usage_frames: u64,
    pub tap_to_pay_usage_frames: u64,
    pub phone_usage_percentage: f64,

    pub statistics: UsageStatistics,
    pub usage_sessions: Vec<UsageSession>,
    pub total_usage_time: f64,

    /// Per-frame records in frame order.
    pub frame_details: Vec<FrameRecord>,
}

impl UsageReport {
    pub const VERSION: &'static str = "1.0";

    /// Assemble a report from frame records and the engine summary.
    pub fn new(
        video_path: impl Into<String>,
        frames: Vec<FrameRecord>,
        summary: UsageSummary,
    ) -> Self {
        let total_frames = frames.len() as u64;
        let active_phone_usage_frames =
            frames.iter().filter(|f| f.active_phone_usage).count() as u64;
        let tap_to_pay_usage_frames =
            frames.iter().filter(|f| f.active_tap_to_pay_usage).count() as u64;

        Self {
            version: Self::VERSION.to_string(),
            video_path: video_path.into(),
            output_path: None,
            processing_time: chrono::Utc::now().to_rfc3339(),
            total_frames,
            active_phone_usage_frames,
            tap_to_pay_usage_frames,
            phone_usage_percentage: percentage(active_phone_usage_frames, total_frames),
            statistics: summary.statistics,
            usage_sessions: summary.sessions,
            total_usage_time: summary.total_usage_time,
            frame_details: frames,
        }
    }

    /// Load a report from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ReportError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ReportError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save the report as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ReportError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ReportError::SerializeError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ReportError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors reading or writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize report for {path}: {source}")]
    SerializeError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FrameActivity;

    fn record(frame_index: u64, phone: bool, tap: bool) -> FrameRecord {
        FrameRecord {
            frame_index,
            timestamp_secs: frame_index as f64 * 0.5,
            phones_detected: usize::from(phone),
            tap_to_pay_detected: usize::from(tap),
            hands_detected: 1,
            active_phone_usage: phone,
            active_tap_to_pay_usage: tap,
            phone_in_motion: false,
            current_hold_secs: 0.0,
            total_hold_secs: 0.0,
            phone_details: vec![],
            tap_to_pay_details: vec![],
        }
    }

    #[test]
    fn test_report_counts() {
        let frames = vec![
            record(0, false, false),
            record(1, true, false),
            record(2, true, true),
            record(3, false, false),
        ];
        let session = UsageSession::between(
            &FrameActivity::new(1, 0.5, true),
            &FrameActivity::new(2, 1.0, true),
        );
        let summary = UsageSummary {
            statistics: UsageStatistics::default(),
            sessions: vec![session],
            total_usage_time: session.duration,
        };

        let report = UsageReport::new("clip.mp4", frames, summary);
        assert_eq!(report.total_frames, 4);
        assert_eq!(report.active_phone_usage_frames, 2);
        assert_eq!(report.tap_to_pay_usage_frames, 1);
        assert_eq!(report.phone_usage_percentage, 50.0);
        assert_eq!(report.usage_sessions.len(), 1);
    }

    #[test]
    fn test_empty_report_has_zero_percentage() {
        let report = UsageReport::new("clip.mp4", vec![], UsageSummary::default());
        assert_eq!(report.phone_usage_percentage, 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("holdwatch-report-{}", std::process::id()));
        let path = dir.join("nested").join("report.json");

        let report = UsageReport::new("clip.mp4", vec![record(0, true, false)], UsageSummary::default());
        report.save(&path).unwrap();

        let loaded = UsageReport::load(&path).unwrap();
        assert_eq!(loaded.video_path, "clip.mp4");
        assert_eq!(loaded.frame_details.len(), 1);
        assert!(loaded.frame_details[0].active_phone_usage);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_malformed_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("holdwatch-report-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.json");
        std::fs::write(&path, "{\"version\":").unwrap();

        let err = UsageReport::load(&path).unwrap_err();
        assert!(matches!(err, ReportError::ParseError { .. }));
        assert!(err.to_string().starts_with("Parse error in"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_serialize_error_message() {
        let source = serde_json::from_str::<u32>("x").unwrap_err();
        let err = ReportError::SerializeError {
            path: PathBuf::from("out/report.json"),
            source,
        };
        assert!(err
            .to_string()
            .starts_with("Failed to serialize report for out/report.json"));
    }

    #[test]
    fn test_load_missing_is_io_error() {
        let err = UsageReport::load("/no/such/report.json").unwrap_err();
        assert!(matches!(err, ReportError::IoError { .. }));
    }
}
