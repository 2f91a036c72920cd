//! Reorder buffer that releases frames strictly in index order.
//!
//! Detector inference may run on several workers and finish out of order,
//! but the hold timer and the histories are order-dependent. Frames go in
//! as they complete and come out contiguous, starting at the expected index.

use std::collections::BTreeMap;

use holdwatch_common::error::{HoldwatchError, HoldwatchResult};
use holdwatch_frame_model::detection::FrameDetections;

/// Buffers out-of-order frames until the next expected index arrives.
///
/// When more than `max_pending` frames are waiting, the awaited index is
/// treated as lost and release resumes at the oldest buffered frame.
#[derive(Debug)]
pub struct FrameSequencer {
    next_index: u64,
    pending: BTreeMap<u64, FrameDetections>,
    max_pending: usize,
}

impl FrameSequencer {
    /// Start expecting `first_index`, holding at most `max_pending` frames.
    pub fn new(first_index: u64, max_pending: usize) -> Self {
        Self {
            next_index: first_index,
            pending: BTreeMap::new(),
            max_pending: max_pending.max(1),
        }
    }

    /// Index the sequencer will release next.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Number of frames waiting for a gap to fill.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Accept a frame and return every frame that is now ready, in order.
    pub fn push(&mut self, frame: FrameDetections) -> HoldwatchResult<Vec<FrameDetections>> {
        let index = frame.frame_index;
        if index < self.next_index {
            return Err(HoldwatchError::sequence(format!(
                "frame {index} arrived after frame {} was already released",
                self.next_index - 1
            )));
        }
        if self.pending.contains_key(&index) {
            return Err(HoldwatchError::sequence(format!(
                "frame {index} submitted twice"
            )));
        }

        self.pending.insert(index, frame);
        if self.pending.len() > self.max_pending {
            self.skip_to_oldest_pending();
        }
        Ok(self.drain_ready())
    }

    /// Give up on the awaited frame and resume at the oldest buffered one.
    fn skip_to_oldest_pending(&mut self) {
        if let Some(&oldest) = self.pending.keys().next() {
            if oldest != self.next_index {
                tracing::warn!(
                    expected = self.next_index,
                    found = oldest,
                    buffered = self.pending.len(),
                    "Reorder buffer full, skipping missing frames"
                );
                self.next_index = oldest;
            }
        }
    }

    fn drain_ready(&mut self) -> Vec<FrameDetections> {
        let mut ready = vec![];
        while let Some(frame) = self.pending.remove(&self.next_index) {
            ready.push(frame);
            self.next_index += 1;
        }
        ready
    }

    /// Release whatever is still buffered, skipping over gaps.
    ///
    /// Call once the source is exhausted. Missing indices are logged.
    pub fn finish(mut self) -> Vec<FrameDetections> {
        let mut remaining = Vec::with_capacity(self.pending.len());
        while let Some((index, frame)) = self.pending.pop_first() {
            if index != self.next_index {
                tracing::warn!(
                    expected = self.next_index,
                    found = index,
                    "Frames missing from detection stream"
                );
            }
            self.next_index = index + 1;
            remaining.push(frame);
        }
        remaining
    }
}
