//! Error types shared across Holdwatch crates.

use std::path::PathBuf;

/// Top-level error type for Holdwatch operations.
#[derive(Debug, thiserror::Error)]
pub enum HoldwatchError {
    #[error("Detection input error: {message}")]
    Detection { message: String },

    #[error("Timing error: {message}")]
    Timing { message: String },

    #[error("Frame sequence error: {message}")]
    Sequence { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Report error: {message}")]
    Report { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using HoldwatchError.
pub type HoldwatchResult<T> = Result<T, HoldwatchError>;

impl HoldwatchError {
    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn timing(msg: impl Into<String>) -> Self {
        Self::Timing {
            message: msg.into(),
        }
    }

    pub fn sequence(msg: impl Into<String>) -> Self {
        Self::Sequence {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn report(msg: impl Into<String>) -> Self {
        Self::Report {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_message() {
        let err = HoldwatchError::timing("went backwards");
        assert_eq!(err.to_string(), "Timing error: went backwards");
    }

    #[test]
    fn test_input_and_report_messages() {
        let err = HoldwatchError::detection("line 3: expected value");
        assert_eq!(err.to_string(), "Detection input error: line 3: expected value");

        let err = HoldwatchError::report("disk full");
        assert!(matches!(err, HoldwatchError::Report { .. }));
        assert_eq!(err.to_string(), "Report error: disk full");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: HoldwatchError = parse.unwrap_err().into();
        assert!(matches!(err, HoldwatchError::Json(_)));
    }
}
