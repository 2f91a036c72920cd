//! Holdwatch Interaction Core: the usage engine
//!
//! Turns per-frame detector output into a time-coherent usage signal:
//! - **Interaction:** Classify each device as held when a hand is within reach
//! - **Hold Timer:** Measure continuous and accumulated hold duration
//! - **Temporal Filter:** Bounded history of activity/position and a downgrade-only smoothing rule
//! - **Sessions:** Extract start/end/duration usage sessions from the activity sequence
//! - **Analyzer:** Run the above per frame, in order
//!
//! This crate is pure computation with no I/O and no detector bindings.
//! Frames must be fed in index order; [`FrameSequencer`] restores order
//! when upstream work completes out of order.

pub mod analyzer;
pub mod config;
pub mod history;
pub mod hold_timer;
pub mod interaction;
pub mod sequencer;
pub mod sessions;
pub mod temporal_filter;

pub use analyzer::{AnalyzedFrame, UsageAnalyzer};
pub use config::InteractionConfig;
pub use hold_timer::HoldTimer;
pub use interaction::InteractionClassifier;
pub use sequencer::FrameSequencer;
pub use sessions::{extract_sessions, summarize_activity, SessionTracker};
pub use temporal_filter::{FilterObserver, TemporalFilter};
