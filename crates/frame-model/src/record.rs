//! Engine outputs: classified devices, per-frame records, and usage sessions.

use serde::{Deserialize, Serialize};

use crate::detection::{DeviceDetection, DeviceKind};
use crate::geometry::{BoundingBox, Point2D};

/// A detection after interaction classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedDevice {
    pub detection: DeviceDetection,

    /// A hand is within reach of the device.
    pub is_being_held: bool,

    /// The device counts toward active usage. Never true unless held.
    pub is_active: bool,
}

impl ClassifiedDevice {
    pub fn new(detection: DeviceDetection, is_being_held: bool) -> Self {
        Self {
            detection,
            is_being_held,
            is_active: is_being_held,
        }
    }

    pub fn kind(&self) -> DeviceKind {
        self.detection.kind
    }

    pub fn center(&self) -> Point2D {
        self.detection.center()
    }

    /// Clear both held and active flags.
    pub fn release(&mut self) {
        self.is_being_held = false;
        self.is_active = false;
    }

    pub fn detail(&self) -> DeviceDetail {
        DeviceDetail {
            bbox: self.detection.bbox,
            confidence: self.detection.confidence,
            is_being_held: self.is_being_held,
        }
    }
}

/// Whether any device in the slice is held.
pub fn any_held(devices: &[ClassifiedDevice]) -> bool {
    devices.iter().any(|d| d.is_being_held)
}

/// Per-device entry in a frame record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDetail {
    pub bbox: BoundingBox,
    pub confidence: f64,
    pub is_being_held: bool,
}

/// Everything the engine reports for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(rename = "frame_idx")]
    pub frame_index: u64,

    #[serde(rename = "timestamp")]
    pub timestamp_secs: f64,

    pub phones_detected: usize,
    pub tap_to_pay_detected: usize,
    pub hands_detected: usize,

    /// Any phone is held after temporal filtering.
    pub active_phone_usage: bool,

    /// Any tap-to-pay device is held.
    #[serde(rename = "tap_to_pay_usage")]
    pub active_tap_to_pay_usage: bool,

    /// The primary phone is moving across recent frames.
    #[serde(default)]
    pub phone_in_motion: bool,

    /// Length of the ongoing hold segment.
    #[serde(default)]
    pub current_hold_secs: f64,

    /// All hold time so far, including the ongoing segment.
    #[serde(default)]
    pub total_hold_secs: f64,

    #[serde(default)]
    pub phone_details: Vec<DeviceDetail>,

    #[serde(default)]
    pub tap_to_pay_details: Vec<DeviceDetail>,
}

impl FrameRecord {
    /// The phone-usage activity sample for this frame.
    pub fn phone_activity(&self) -> FrameActivity {
        FrameActivity {
            frame_index: self.frame_index,
            timestamp_secs: self.timestamp_secs,
            active: self.active_phone_usage,
        }
    }
}

/// One sample of the per-frame activity sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameActivity {
    pub frame_index: u64,
    pub timestamp_secs: f64,
    pub active: bool,
}

impl FrameActivity {
    pub fn new(frame_index: u64, timestamp_secs: f64, active: bool) -> Self {
        Self {
            frame_index,
            timestamp_secs,
            active,
        }
    }
}

/// One continuous run of active frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageSession {
    pub start_time: f64,
    pub end_time: f64,
    #[serde(rename = "start_frame")]
    pub start_frame_index: u64,
    #[serde(rename = "end_frame")]
    pub end_frame_index: u64,
    pub duration: f64,
}

impl UsageSession {
    /// Build a session between two activity samples.
    pub fn between(start: &FrameActivity, end: &FrameActivity) -> Self {
        Self {
            start_time: start.timestamp_secs,
            end_time: end.timestamp_secs,
            start_frame_index: start.frame_index,
            end_frame_index: end.frame_index,
            duration: end.timestamp_secs - start.timestamp_secs,
        }
    }

    /// Number of frames covered, inclusive of both ends. 0 when the ends are inverted.
    pub fn frame_span(&self) -> u64 {
        self.end_frame_index
            .checked_sub(self.start_frame_index)
            .map_or(0, |d| d.saturating_add(1))
    }
}

/// Aggregate counters over the analyzed video.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageStatistics {
    pub total_frames: u64,
    pub active_frames: u64,
    pub usage_percentage: f64,
    pub total_phone_hold_time: f64,
    pub current_phone_hold_time: f64,
}

/// End-of-video summary: statistics plus the ordered session list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageSummary {
    pub statistics: UsageStatistics,
    pub sessions: Vec<UsageSession>,
    pub total_usage_time: f64,
}

/// `part / total * 100`, or 0 when `total` is 0.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
