//! Per-frame hold classification.
//!
//! A device is held when at least one hand center lies within
//! `distance_threshold_px` of the device center. There is no weighting
//! across hands and no memory of earlier frames.

use holdwatch_frame_model::detection::{DeviceDetection, HandObservation};
use holdwatch_frame_model::geometry::{is_within_reach, FrameSize};
use holdwatch_frame_model::record::ClassifiedDevice;

/// Stateless hand-proximity classifier.
#[derive(Debug, Clone, Copy)]
pub struct InteractionClassifier {
    distance_threshold_px: f64,
}

impl InteractionClassifier {
    pub fn new(distance_threshold_px: f64) -> Self {
        Self {
            distance_threshold_px,
        }
    }

    pub fn distance_threshold_px(&self) -> f64 {
        self.distance_threshold_px
    }

    /// Whether any hand is within reach of the device.
    pub fn is_held(
        &self,
        device: &DeviceDetection,
        hands: &[HandObservation],
        frame: FrameSize,
    ) -> bool {
        let center = device.center();
        hands
            .iter()
            .any(|hand| is_within_reach(center, hand.center, frame, self.distance_threshold_px))
    }

    /// Classify each device independently, preserving input order.
    pub fn classify<'a>(
        &self,
        devices: impl IntoIterator<Item = &'a DeviceDetection>,
        hands: &[HandObservation],
        frame: FrameSize,
    ) -> Vec<ClassifiedDevice> {
        devices
            .into_iter()
            .map(|device| ClassifiedDevice::new(device.clone(), self.is_held(device, hands, frame)))
            .collect()
    }
}

impl Default for InteractionClassifier {
    fn default() -> Self {
        Self::new(200.0)
    }
}
