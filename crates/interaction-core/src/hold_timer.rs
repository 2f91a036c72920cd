//! Hold-duration stopwatch for one device class.
//!
//! ```text
//!            held                 held
//!  Released ──────► Held ◄──────────┐
//!     ▲              │  └───────────┘ segment = now - start
//!     └──────────────┘
//!       released: total += now - start
//! ```
//!
//! The segment length is recomputed from the start instant on every update
//! rather than incremented, so irregular update intervals do not drift.
//! Time must not go backwards: such updates are rejected and leave the
//! timer unchanged.

use serde::{Deserialize, Serialize};

use holdwatch_common::error::{HoldwatchError, HoldwatchResult};

/// Snapshot of the timer, suitable for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldTimerState {
    pub accumulated_duration: f64,
    pub is_held: bool,
    pub hold_start_timestamp: Option<f64>,
    pub current_segment_duration: f64,
}

/// A hold transition produced by an update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldTransition {
    /// A hold began at this instant.
    Started { at_secs: f64 },
    /// A hold ended; `segment_secs` was committed to the total.
    Ended { at_secs: f64, segment_secs: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Released,
    Held { since_secs: f64 },
}

/// Continuous and accumulated hold timer.
#[derive(Debug, Clone)]
pub struct HoldTimer {
    phase: Phase,
    accumulated_secs: f64,
    current_segment_secs: f64,
    last_update_secs: Option<f64>,
}

impl HoldTimer {
    pub fn new() -> Self {
        Self {
            phase: Phase::Released,
            accumulated_secs: 0.0,
            current_segment_secs: 0.0,
            last_update_secs: None,
        }
    }

    /// Feed one observation: whether the device class is held at `now_secs`.
    pub fn update(&mut self, held: bool, now_secs: f64) -> HoldwatchResult<Option<HoldTransition>> {
        self.check_time(now_secs)?;
        self.last_update_secs = Some(now_secs);

        let transition = match (self.phase, held) {
            (Phase::Released, true) => {
                self.phase = Phase::Held {
                    since_secs: now_secs,
                };
                self.current_segment_secs = 0.0;
                Some(HoldTransition::Started { at_secs: now_secs })
            }
            (Phase::Held { since_secs }, true) => {
                self.current_segment_secs = now_secs - since_secs;
                None
            }
            (Phase::Held { since_secs }, false) => {
                let segment_secs = now_secs - since_secs;
                self.accumulated_secs += segment_secs;
                self.current_segment_secs = 0.0;
                self.phase = Phase::Released;
                Some(HoldTransition::Ended {
                    at_secs: now_secs,
                    segment_secs,
                })
            }
            (Phase::Released, false) => None,
        };

        Ok(transition)
    }

    fn check_time(&self, now_secs: f64) -> HoldwatchResult<()> {
        if !now_secs.is_finite() {
            return Err(HoldwatchError::timing(format!(
                "hold timer received non-finite time {now_secs}"
            )));
        }
        match self.last_update_secs {
            Some(last) if now_secs < last => Err(HoldwatchError::timing(format!(
                "hold timer went backwards: {now_secs}s after {last}s"
            ))),
            _ => Ok(()),
        }
    }

    pub fn is_held(&self) -> bool {
        matches!(self.phase, Phase::Held { .. })
    }

    /// Length of the ongoing hold, or 0 when released.
    pub fn current_duration(&self) -> f64 {
        if self.is_held() {
            self.current_segment_secs
        } else {
            0.0
        }
    }

    /// All committed hold time plus the ongoing segment.
    pub fn total_duration(&self) -> f64 {
        self.accumulated_secs + self.current_duration()
    }

    pub fn state(&self) -> HoldTimerState {
        HoldTimerState {
            accumulated_duration: self.accumulated_secs,
            is_held: self.is_held(),
            hold_start_timestamp: match self.phase {
                Phase::Held { since_secs } => Some(since_secs),
                Phase::Released => None,
            },
            current_segment_duration: self.current_segment_secs,
        }
    }
}

impl Default for HoldTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_hold_segment() {
        let mut timer = HoldTimer::new();
        let held = [false, true, true, true, false];
        let mut currents = vec![];

        for (t, &h) in held.iter().enumerate() {
            timer.update(h, t as f64).unwrap();
            if h {
                currents.push(timer.current_duration());
            }
        }

        assert_eq!(currents, vec![0.0, 1.0, 2.0]);
        assert!(!timer.is_held());
        assert_eq!(timer.current_duration(), 0.0);
        assert_eq!(timer.total_duration(), 3.0);
    }

    #[test]
    fn test_second_segment_accumulates() {
        let mut timer = HoldTimer::new();
        for (t, h) in [(0.0, false), (1.0, true), (2.0, true), (3.0, true), (4.0, false)] {
            timer.update(h, t).unwrap();
        }
        timer.update(true, 5.0).unwrap();
        timer.update(false, 6.0).unwrap();
        assert_eq!(timer.total_duration(), 4.0);
    }

    #[test]
    fn test_total_includes_ongoing_segment() {
        let mut timer = HoldTimer::new();
        timer.update(true, 10.0).unwrap();
        timer.update(true, 12.5).unwrap();
        assert_eq!(timer.current_duration(), 2.5);
        assert_eq!(timer.total_duration(), 2.5);

        let state = timer.state();
        assert!(state.is_held);
        assert_eq!(state.hold_start_timestamp, Some(10.0));
        assert_eq!(state.accumulated_duration, 0.0);
    }

    #[test]
    fn test_new_hold_resets_segment() {
        let mut timer = HoldTimer::new();
        timer.update(true, 0.0).unwrap();
        timer.update(true, 3.0).unwrap();
        timer.update(false, 4.0).unwrap();

        let started = timer.update(true, 8.0).unwrap();
        assert_eq!(started, Some(HoldTransition::Started { at_secs: 8.0 }));
        assert_eq!(timer.current_duration(), 0.0);
        assert_eq!(timer.total_duration(), 4.0);
    }

    #[test]
    fn test_transitions_reported() {
        let mut timer = HoldTimer::new();
        assert_eq!(timer.update(false, 0.0).unwrap(), None);
        assert!(matches!(
            timer.update(true, 1.0).unwrap(),
            Some(HoldTransition::Started { .. })
        ));
        assert_eq!(timer.update(true, 2.0).unwrap(), None);
        assert_eq!(
            timer.update(false, 3.0).unwrap(),
            Some(HoldTransition::Ended {
                at_secs: 3.0,
                segment_secs: 2.0
            })
        );
    }

    #[test]
    fn test_backwards_time_rejected_without_side_effects() {
        let mut timer = HoldTimer::new();
        timer.update(true, 5.0).unwrap();
        timer.update(true, 6.0).unwrap();

        let err = timer.update(false, 4.0).unwrap_err();
        assert!(matches!(err, HoldwatchError::Timing { .. }));
        assert!(timer.is_held());
        assert_eq!(timer.current_duration(), 1.0);

        assert!(timer.update(true, f64::NAN).is_err());
        // Equal timestamps are allowed.
        assert!(timer.update(true, 6.0).is_ok());
    }

    #[test]
    fn test_accumulated_never_decreases() {
        let mut timer = HoldTimer::new();
        let pattern = [true, false, true, true, false, false, true, false];
        let mut last_total = 0.0;
        for (i, &h) in pattern.iter().enumerate() {
            timer.update(h, i as f64 * 0.5).unwrap();
            let accumulated = timer.state().accumulated_duration;
            assert!(accumulated >= last_total);
            last_total = accumulated;
        }
    }
}
