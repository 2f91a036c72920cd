//! Usage session extraction from the per-frame activity sequence.
//!
//! A session runs from the first active frame of a run to the last active
//! frame of that run. A single active frame yields a zero-length session.
//! A run still open at the end of the sequence is closed at the last frame.

use holdwatch_frame_model::record::{
    percentage, FrameActivity, UsageSession, UsageStatistics, UsageSummary,
};

/// Incremental session builder. Feed samples in frame order.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    open: Option<(FrameActivity, FrameActivity)>,
    completed: Vec<UsageSession>,
    last: Option<FrameActivity>,
    total_frames: u64,
    active_frames: u64,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next sample. Returns the session this sample closed, if any.
    pub fn push(&mut self, sample: FrameActivity) -> Option<UsageSession> {
        self.total_frames += 1;
        self.last = Some(sample);

        if sample.active {
            self.active_frames += 1;
            match self.open.as_mut() {
                Some((_, last_active)) => *last_active = sample,
                None => self.open = Some((sample, sample)),
            }
            return None;
        }

        let (start, last_active) = self.open.take()?;
        let session = UsageSession::between(&start, &last_active);
        self.completed.push(session);
        Some(session)
    }

    /// Sessions completed so far.
    pub fn completed(&self) -> &[UsageSession] {
        &self.completed
    }

    /// Whether a run is currently open.
    pub fn in_session(&self) -> bool {
        self.open.is_some()
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn active_frames(&self) -> u64 {
        self.active_frames
    }

    /// Close any open run at the last sample seen and return all sessions.
    pub fn finish(mut self) -> Vec<UsageSession> {
        if let (Some((start, _)), Some(last)) = (self.open.take(), self.last) {
            self.completed.push(UsageSession::between(&start, &last));
        }
        self.completed
    }

    /// Sessions as they would be if the sequence ended now.
    pub fn snapshot(&self) -> Vec<UsageSession> {
        self.clone().finish()
    }
}

/// Extract sessions from a full activity sequence.
pub fn extract_sessions(samples: &[FrameActivity]) -> Vec<UsageSession> {
    let mut tracker = SessionTracker::new();
    for sample in samples {
        tracker.push(*sample);
    }
    tracker.finish()
}

/// Sum of session durations.
pub fn total_usage_time(sessions: &[UsageSession]) -> f64 {
    sessions.iter().map(|s| s.duration).sum()
}

/// Sessions plus frame statistics for an activity sequence.
///
/// Hold-time fields are left at 0; they come from the hold timer.
pub fn summarize_activity(samples: &[FrameActivity]) -> UsageSummary {
    let sessions = extract_sessions(samples);
    let total_frames = samples.len() as u64;
    let active_frames = samples.iter().filter(|s| s.active).count() as u64;

    UsageSummary {
        statistics: UsageStatistics {
            total_frames,
            active_frames,
            usage_percentage: percentage(active_frames, total_frames),
            ..Default::default()
        },
        total_usage_time: total_usage_time(&sessions),
        sessions,
    }
}
