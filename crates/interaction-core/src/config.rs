//! Engine tunables.

use holdwatch_common::config::{AnalysisDefaults, TimerClock};
use holdwatch_common::error::{HoldwatchError, HoldwatchResult};

/// Configuration for the usage engine, fixed for the lifetime of an analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Minimum device confidence kept at ingestion. Not applied by the engine itself.
    pub phone_confidence_threshold: f64,

    /// Minimum hand confidence kept at ingestion. Not applied by the engine itself.
    pub hand_confidence_threshold: f64,

    /// Maximum device-to-hand center distance (pixels) for "held".
    pub distance_threshold_px: f64,

    /// Position samples considered by motion detection.
    pub min_motion_frames: usize,

    /// Average per-frame displacement (pixels) above which the device is moving.
    pub motion_threshold: f64,

    /// Unit for the temporal filter's warm-up and look-back windows.
    pub max_inactive_frames: usize,

    /// Which device's position is tracked across frames.
    pub primary_device: PrimaryDevicePolicy,

    /// Time base for the hold timer.
    pub timer_clock: TimerClock,
}

/// How the tracked (primary) device is chosen each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimaryDevicePolicy {
    /// The first phone in detector output order.
    #[default]
    FirstDetected,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self::from(&AnalysisDefaults::default())
    }
}

impl From<&AnalysisDefaults> for InteractionConfig {
    fn from(defaults: &AnalysisDefaults) -> Self {
        Self {
            phone_confidence_threshold: defaults.phone_confidence_threshold,
            hand_confidence_threshold: defaults.hand_confidence_threshold,
            distance_threshold_px: defaults.distance_threshold_px,
            min_motion_frames: defaults.min_motion_frames,
            motion_threshold: defaults.motion_threshold,
            max_inactive_frames: defaults.max_inactive_frames,
            primary_device: PrimaryDevicePolicy::FirstDetected,
            timer_clock: defaults.timer_clock,
        }
    }
}

impl InteractionConfig {
    /// Retention window for the position and activity histories.
    pub fn max_history(&self) -> usize {
        self.min_motion_frames.max(self.max_inactive_frames) * 2
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> HoldwatchResult<()> {
        for (name, value) in [
            ("phone_confidence_threshold", self.phone_confidence_threshold),
            ("hand_confidence_threshold", self.hand_confidence_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(HoldwatchError::config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if !self.distance_threshold_px.is_finite() || self.distance_threshold_px <= 0.0 {
            return Err(HoldwatchError::config(format!(
                "distance_threshold_px must be positive, got {}",
                self.distance_threshold_px
            )));
        }

        if !self.motion_threshold.is_finite() || self.motion_threshold < 0.0 {
            return Err(HoldwatchError::config(format!(
                "motion_threshold must be non-negative, got {}",
                self.motion_threshold
            )));
        }

        if self.min_motion_frames == 0 || self.max_inactive_frames == 0 {
            return Err(HoldwatchError::config(
                "min_motion_frames and max_inactive_frames must be at least 1",
            ));
        }

        Ok(())
    }
}
