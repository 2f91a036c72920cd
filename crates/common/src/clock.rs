//! Clock and timing utilities.
//!
//! Two time bases feed the analysis engine:
//! - [`FrameClock`] maps a frame index to video presentation time
//! - [`RecordingClock`] measures monotonic processing time since start
//!
//! Both only ever move forward, which the hold timer relies on.

use std::time::Instant;

use crate::error::{HoldwatchError, HoldwatchResult};

/// Video time derived from a constant frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    fps: f64,
}

impl FrameClock {
    /// Create a clock for the given frame rate. The rate must be finite and positive.
    pub fn new(fps: f64) -> HoldwatchResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(HoldwatchError::config(format!(
                "frame rate must be positive, got {fps}"
            )));
        }
        Ok(Self { fps })
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Presentation timestamp of a frame in seconds.
    pub fn timestamp_secs(&self, frame_index: u64) -> f64 {
        frame_index as f64 / self.fps
    }

    /// Duration of one frame in seconds.
    pub fn frame_interval_secs(&self) -> f64 {
        1.0 / self.fps
    }
}

/// A processing clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment analysis started).
#[derive(Debug, Clone)]
pub struct RecordingClock {
    /// The instant analysis started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl RecordingClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get seconds elapsed since start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Throughput meter for progress logging.
#[derive(Debug)]
pub struct ProgressMeter {
    every: u64,
    processed: u64,
    started: Instant,
}

impl ProgressMeter {
    /// Report progress every `every` items (minimum 1).
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            processed: 0,
            started: Instant::now(),
        }
    }

    /// Count one item. Returns the current rate (items/sec) when a report is due.
    pub fn tick(&mut self) -> Option<f64> {
        self.processed += 1;
        if self.processed % self.every != 0 {
            return None;
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        Some(if elapsed > 0.0 {
            self.processed as f64 / elapsed
        } else {
            0.0
        })
    }

    /// Items counted so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }
}
