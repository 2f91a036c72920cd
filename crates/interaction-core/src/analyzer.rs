//! Per-frame orchestration of the usage engine.
//!
//! # Pipeline (per frame)
//!
//! 1. **Classify** phones and tap-to-pay devices against the frame's hands.
//! 2. **Time** the phone hold with the hold timer.
//! 3. **Record** the primary phone position and phone activity in the histories.
//! 4. **Filter** the phone verdicts with the temporal rule (downgrade only).
//! 5. **Emit** a [`FrameRecord`] and feed the session tracker.
//!
//! Only phones are timed and tracked; tap-to-pay devices are classified and
//! reported but carry no temporal state.

use holdwatch_common::error::{HoldwatchError, HoldwatchResult};
use holdwatch_frame_model::detection::{DeviceKind, FrameDetections};
use holdwatch_frame_model::geometry::{FrameSize, Point2D};
use holdwatch_frame_model::record::{
    any_held, percentage, ClassifiedDevice, FrameActivity, FrameRecord, UsageStatistics,
    UsageSummary,
};

use crate::config::{InteractionConfig, PrimaryDevicePolicy};
use crate::history::{detect_motion, ActivityHistory, PositionHistory};
use crate::hold_timer::{HoldTimer, HoldTransition};
use crate::interaction::InteractionClassifier;
use crate::sessions::{total_usage_time, SessionTracker};
use crate::temporal_filter::{FilterObserver, SuppressionEvent, TemporalFilter, TracingObserver};

/// Result of analyzing one frame.
#[derive(Debug, Clone)]
pub struct AnalyzedFrame {
    /// The downstream record for rendering and persistence.
    pub record: FrameRecord,

    /// Phones after classification and temporal filtering, in detector order.
    pub phones: Vec<ClassifiedDevice>,

    /// Tap-to-pay devices after classification, in detector order.
    pub tap_to_pay: Vec<ClassifiedDevice>,

    /// Hold start/end produced by this frame.
    pub hold_transition: Option<HoldTransition>,

    /// Set when the temporal filter cleared phones on this frame.
    pub suppression: Option<SuppressionEvent>,
}

/// Stateful analyzer for one video. Feed frames in index order.
pub struct UsageAnalyzer {
    config: InteractionConfig,
    frame_size: FrameSize,
    classifier: InteractionClassifier,
    filter: TemporalFilter,
    phone_timer: HoldTimer,
    positions: PositionHistory,
    activity: ActivityHistory,
    sessions: SessionTracker,
    activity_log: Vec<FrameActivity>,
    observer: Box<dyn FilterObserver>,
    last_frame: Option<(u64, f64)>,
}

impl UsageAnalyzer {
    /// Create an analyzer for frames of the given size.
    pub fn new(config: InteractionConfig, frame_size: FrameSize) -> HoldwatchResult<Self> {
        config.validate()?;
        if frame_size.width == 0 || frame_size.height == 0 {
            return Err(HoldwatchError::config(format!(
                "frame size must be non-zero, got {}x{}",
                frame_size.width, frame_size.height
            )));
        }

        let max_history = config.max_history();
        Ok(Self {
            classifier: InteractionClassifier::new(config.distance_threshold_px),
            filter: TemporalFilter::new(config.max_inactive_frames),
            phone_timer: HoldTimer::new(),
            positions: PositionHistory::new(max_history),
            activity: ActivityHistory::new(max_history),
            sessions: SessionTracker::new(),
            activity_log: Vec::new(),
            observer: Box::new(TracingObserver),
            last_frame: None,
            frame_size,
            config,
        })
    }

    /// Replace the filter diagnostics observer.
    pub fn with_observer(mut self, observer: impl FilterObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn frame_size(&self) -> FrameSize {
        self.frame_size
    }

    /// Analyze a frame, timing holds against the frame's own timestamp.
    ///
    /// Use [`process_frame_at`](Self::process_frame_at) when the analyzer is
    /// configured for [`TimerClock::Wall`].
    pub fn process_frame(&mut self, frame: &FrameDetections) -> HoldwatchResult<AnalyzedFrame> {
        self.process_frame_at(frame, frame.timestamp_secs)
    }

    /// Analyze a frame, timing holds against `timer_secs`.
    pub fn process_frame_at(
        &mut self,
        frame: &FrameDetections,
        timer_secs: f64,
    ) -> HoldwatchResult<AnalyzedFrame> {
        self.check_order(frame)?;

        let mut phones = self.classifier.classify(
            frame.devices_of(DeviceKind::Phone),
            &frame.hands,
            self.frame_size,
        );
        let tap_to_pay = self.classifier.classify(
            frame.devices_of(DeviceKind::TapToPay),
            &frame.hands,
            self.frame_size,
        );

        let phone_held = any_held(&phones);
        let hold_transition = self.phone_timer.update(phone_held, timer_secs)?;
        self.last_frame = Some((frame.frame_index, frame.timestamp_secs));

        match hold_transition {
            Some(HoldTransition::Started { at_secs }) => {
                tracing::debug!(frame = frame.frame_index, at_secs, "Phone hold started");
            }
            Some(HoldTransition::Ended {
                at_secs,
                segment_secs,
            }) => {
                tracing::debug!(
                    frame = frame.frame_index,
                    at_secs,
                    segment_secs,
                    "Phone hold ended"
                );
            }
            None => {}
        }

        self.positions.push(self.primary_position(&phones));
        self.activity.push(phone_held);

        let suppression = self
            .filter
            .apply(frame.frame_index, &self.activity, &mut phones);
        if let Some(event) = &suppression {
            self.observer.on_suppressed(event);
        }

        let phone_in_motion = detect_motion(
            &self.positions,
            self.config.min_motion_frames,
            self.config.motion_threshold,
        );

        let record = FrameRecord {
            frame_index: frame.frame_index,
            timestamp_secs: frame.timestamp_secs,
            phones_detected: phones.len(),
            tap_to_pay_detected: tap_to_pay.len(),
            hands_detected: frame.hands.len(),
            active_phone_usage: any_held(&phones),
            active_tap_to_pay_usage: any_held(&tap_to_pay),
            phone_in_motion,
            current_hold_secs: self.phone_timer.current_duration(),
            total_hold_secs: self.phone_timer.total_duration(),
            phone_details: phones.iter().map(ClassifiedDevice::detail).collect(),
            tap_to_pay_details: tap_to_pay.iter().map(ClassifiedDevice::detail).collect(),
        };

        let activity = record.phone_activity();
        self.activity_log.push(activity);
        if let Some(session) = self.sessions.push(activity) {
            tracing::debug!(
                start = session.start_time,
                end = session.end_time,
                duration = session.duration,
                "Usage session closed"
            );
        }

        Ok(AnalyzedFrame {
            record,
            phones,
            tap_to_pay,
            hold_transition,
            suppression,
        })
    }

    fn check_order(&self, frame: &FrameDetections) -> HoldwatchResult<()> {
        if !frame.timestamp_secs.is_finite() {
            return Err(HoldwatchError::timing(format!(
                "frame {} has non-finite timestamp",
                frame.frame_index
            )));
        }
        let Some((last_index, last_secs)) = self.last_frame else {
            return Ok(());
        };
        if frame.frame_index <= last_index {
            return Err(HoldwatchError::sequence(format!(
                "frame {} received after frame {last_index}",
                frame.frame_index
            )));
        }
        if frame.timestamp_secs < last_secs {
            return Err(HoldwatchError::timing(format!(
                "frame {} timestamp {}s precedes previous {}s",
                frame.frame_index, frame.timestamp_secs, last_secs
            )));
        }
        Ok(())
    }

    fn primary_position(&self, phones: &[ClassifiedDevice]) -> Option<Point2D> {
        match self.config.primary_device {
            PrimaryDevicePolicy::FirstDetected => phones.first().map(ClassifiedDevice::center),
        }
    }

    /// Phone hold timer (read-only).
    pub fn phone_timer(&self) -> &HoldTimer {
        &self.phone_timer
    }

    /// Bounded phone activity history.
    pub fn activity_history(&self) -> &ActivityHistory {
        &self.activity
    }

    /// Bounded primary-phone position history.
    pub fn position_history(&self) -> &PositionHistory {
        &self.positions
    }

    /// Full per-frame phone activity sequence, in frame order.
    pub fn activity_log(&self) -> &[FrameActivity] {
        &self.activity_log
    }

    /// Whether the primary phone is currently moving.
    pub fn is_phone_moving(&self) -> bool {
        detect_motion(
            &self.positions,
            self.config.min_motion_frames,
            self.config.motion_threshold,
        )
    }

    /// Frame and hold-time statistics over every frame processed so far.
    pub fn statistics(&self) -> UsageStatistics {
        let total_frames = self.sessions.total_frames();
        let active_frames = self.sessions.active_frames();
        UsageStatistics {
            total_frames,
            active_frames,
            usage_percentage: percentage(active_frames, total_frames),
            total_phone_hold_time: self.phone_timer.total_duration(),
            current_phone_hold_time: self.phone_timer.current_duration(),
        }
    }

    /// Statistics and sessions as if the video ended at the last frame processed.
    pub fn summary(&self) -> UsageSummary {
        let sessions = self.sessions.snapshot();
        UsageSummary {
            statistics: self.statistics(),
            total_usage_time: total_usage_time(&sessions),
            sessions,
        }
    }
}
