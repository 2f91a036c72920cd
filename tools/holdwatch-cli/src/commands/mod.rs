pub mod analyze;
pub mod info;
pub mod init_config;
pub mod validate;

use std::path::Path;

use holdwatch_common::error::{HoldwatchError, HoldwatchResult};
use holdwatch_frame_model::detection::{parse_stream, DetectionStream};
use holdwatch_frame_model::report::UsageReport;

/// Read and parse a detection stream file.
pub fn load_detections(path: &Path) -> HoldwatchResult<DetectionStream> {
    if !path.exists() {
        return Err(HoldwatchError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_stream(&content).map_err(|e| {
        HoldwatchError::detection(format!("failed to parse {}: {e}", path.display()))
    })
}

pub fn load_report(path: &Path) -> HoldwatchResult<UsageReport> {
    UsageReport::load(path).map_err(|e| HoldwatchError::report(e.to_string()))
}

pub fn save_report(report: &UsageReport, path: &Path) -> HoldwatchResult<()> {
    report
        .save(path)
        .map_err(|e| HoldwatchError::report(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("holdwatch-cli-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_malformed_stream_is_detection_error() {
        let dir = scratch_dir("malformed");
        let path = dir.join("detections.jsonl");
        std::fs::write(&path, "{\"frame\":0,\"t\":0.0}\nnot json\n").unwrap();

        let err = load_detections(&path).unwrap_err();
        assert!(matches!(err, HoldwatchError::Detection { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_stream_is_file_not_found() {
        let err = load_detections(Path::new("/no/such/detections.jsonl")).unwrap_err();
        assert!(matches!(err, HoldwatchError::FileNotFound { .. }));
    }

    #[test]
    fn test_report_failures_are_report_errors() {
        let err = load_report(Path::new("/no/such/report.json")).unwrap_err();
        assert!(matches!(err, HoldwatchError::Report { .. }));

        let dir = scratch_dir("report");
        let path = dir.join("report.json");
        std::fs::write(&path, "{}").unwrap();
        let err = load_report(&path).unwrap_err();
        assert!(matches!(err, HoldwatchError::Report { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }
}
