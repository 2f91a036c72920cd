//! Bounded per-frame histories and the motion signal derived from them.

use std::collections::VecDeque;

use holdwatch_frame_model::geometry::{distance, Point2D};

/// A fixed-capacity FIFO window. Pushing past capacity drops the oldest entry.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: T) {
        self.entries.push_back(value);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The most recent `n` entries (or fewer), oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }
}

/// Per-frame "any phone held" flags.
pub type ActivityHistory = BoundedHistory<bool>;

/// Per-frame primary device centers; `None` when no device was detected.
pub type PositionHistory = BoundedHistory<Option<Point2D>>;

impl ActivityHistory {
    /// Fraction of active frames among the most recent `window`, or 0 when empty.
    pub fn activity_rate(&self, window: usize) -> f64 {
        let (active, total) = self
            .recent(window)
            .fold((0usize, 0usize), |(a, t), &flag| (a + usize::from(flag), t + 1));
        if total == 0 {
            0.0
        } else {
            active as f64 / total as f64
        }
    }
}

/// Whether the tracked device moved more than `motion_threshold` pixels per
/// frame on average over the last `min_motion_frames` samples.
///
/// Pairs where either sample is missing contribute no movement but still
/// count toward the average.
pub fn detect_motion(
    positions: &PositionHistory,
    min_motion_frames: usize,
    motion_threshold: f64,
) -> bool {
    if min_motion_frames < 2 || positions.len() < min_motion_frames {
        return false;
    }

    let recent: Vec<Option<Point2D>> = positions.recent(min_motion_frames).copied().collect();
    let total_movement: f64 = recent
        .windows(2)
        .filter_map(|pair| match (pair[0], pair[1]) {
            (Some(a), Some(b)) => Some(distance(a, b)),
            _ => None,
        })
        .sum();

    let avg_movement = total_movement / (recent.len() - 1) as f64;
    avg_movement > motion_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_drops_oldest() {
        let mut history = BoundedHistory::new(3);
        for i in 0..5 {
            history.push(i);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(history.latest(), Some(&4));
    }

    #[test]
    fn test_recent_window() {
        let mut history = BoundedHistory::new(10);
        for i in 0..4 {
            history.push(i);
        }
        assert_eq!(history.recent(2).copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(history.recent(9).count(), 4);
    }

    #[test]
    fn test_activity_rate() {
        let mut history = ActivityHistory::new(10);
        assert_eq!(history.activity_rate(5), 0.0);
        for flag in [true, false, false, true] {
            history.push(flag);
        }
        assert_eq!(history.activity_rate(4), 0.5);
        assert_eq!(history.activity_rate(1), 1.0);
        assert_eq!(history.activity_rate(0), 0.0);
    }

    #[test]
    fn test_motion_needs_enough_samples() {
        let mut positions = PositionHistory::new(6);
        positions.push(Some(Point2D::new(0.0, 0.0)));
        positions.push(Some(Point2D::new(100.0, 0.0)));
        assert!(!detect_motion(&positions, 3, 5.0));
    }

    #[test]
    fn test_motion_detected_above_threshold() {
        let mut positions = PositionHistory::new(6);
        for x in [0.0, 10.0, 20.0] {
            positions.push(Some(Point2D::new(x, 0.0)));
        }
        assert!(detect_motion(&positions, 3, 5.0));
        assert!(!detect_motion(&positions, 3, 10.0));
    }

    #[test]
    fn test_missing_positions_contribute_nothing() {
        let mut positions = PositionHistory::new(6);
        positions.push(Some(Point2D::new(0.0, 0.0)));
        positions.push(None);
        positions.push(Some(Point2D::new(100.0, 0.0)));
        assert!(!detect_motion(&positions, 3, 5.0));
    }

    #[test]
    fn test_stationary_device_is_not_moving() {
        let mut positions = PositionHistory::new(6);
        for _ in 0..5 {
            positions.push(Some(Point2D::new(320.0, 240.0)));
        }
        assert!(!detect_motion(&positions, 3, 0.0));
    }

    proptest! {
        #[test]
        fn history_keeps_most_recent_in_order(
            capacity in 1usize..40,
            values in proptest::collection::vec(any::<u32>(), 0..120),
        ) {
            let mut history = BoundedHistory::new(capacity);
            for &v in &values {
                history.push(v);
                prop_assert!(history.len() <= capacity);
            }
            let kept: Vec<u32> = history.iter().copied().collect();
            let start = values.len().saturating_sub(capacity);
            prop_assert_eq!(kept, values[start..].to_vec());
        }
    }
}
