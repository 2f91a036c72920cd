//! Downgrade-only temporal smoothing over the activity history.
//!
//! # Rule
//!
//! Once the history holds at least `3 × max_inactive_frames` entries, look at
//! the most recent `2 × max_inactive_frames`. If none of them were active and
//! no device is held right now, every device is forced to not-held.
//!
//! The rule can only clear flags, never set them. Because it requires that
//! nothing is currently held, it does not change any verdict today; it marks
//! the place where a stricter inactivity filter would plug in. Note also that
//! the warm-up length exceeds the default history window (`2 × max(...)`),
//! so with default settings the rule never engages.

use holdwatch_frame_model::record::{any_held, ClassifiedDevice};

use crate::history::ActivityHistory;

/// Emitted when the filter clears devices for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuppressionEvent {
    pub frame_index: u64,
    /// Number of devices whose flags were cleared.
    pub devices: usize,
    /// Length of the inspected look-back window.
    pub window: usize,
    /// Activity rate over that window.
    pub activity_rate: f64,
}

/// Subscriber for filter diagnostics.
pub trait FilterObserver {
    fn on_suppressed(&mut self, event: &SuppressionEvent);
}

impl<F> FilterObserver for F
where
    F: FnMut(&SuppressionEvent),
{
    fn on_suppressed(&mut self, event: &SuppressionEvent) {
        self(event)
    }
}

/// Default observer: emits a `tracing` debug event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FilterObserver for TracingObserver {
    fn on_suppressed(&mut self, event: &SuppressionEvent) {
        tracing::debug!(
            frame = event.frame_index,
            devices = event.devices,
            window = event.window,
            "Temporal filter marked devices inactive after extended inactivity"
        );
    }
}

/// The inactivity filter.
#[derive(Debug, Clone, Copy)]
pub struct TemporalFilter {
    max_inactive_frames: usize,
}

impl TemporalFilter {
    pub fn new(max_inactive_frames: usize) -> Self {
        Self {
            max_inactive_frames,
        }
    }

    /// History length required before the filter looks at anything.
    pub fn warmup_len(&self) -> usize {
        self.max_inactive_frames * 3
    }

    /// Look-back window inspected once warmed up.
    pub fn window_len(&self) -> usize {
        self.max_inactive_frames * 2
    }

    /// Apply the rule to this frame's devices.
    ///
    /// Returns an event when at least one device was cleared.
    pub fn apply(
        &self,
        frame_index: u64,
        history: &ActivityHistory,
        devices: &mut [ClassifiedDevice],
    ) -> Option<SuppressionEvent> {
        if history.is_empty() || history.len() < self.warmup_len() {
            return None;
        }

        let window = self.window_len();
        let activity_rate = history.activity_rate(window);
        if activity_rate != 0.0 || any_held(devices) || devices.is_empty() {
            return None;
        }

        for device in devices.iter_mut() {
            device.release();
        }

        Some(SuppressionEvent {
            frame_index,
            devices: devices.len(),
            window,
            activity_rate,
        })
    }
}
