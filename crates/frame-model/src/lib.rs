//! Holdwatch Frame Model
//!
//! Defines the data contracts flowing through the usage engine:
//! - **Geometry:** Points, boxes, frame sizes and the device/hand reach test
//! - **Detections:** Per-frame device boxes and hand observations from external detectors
//! - **Records:** Classified devices, per-frame activity records and usage sessions
//! - **Report:** The end-of-video document persisted by the CLI
//!
//! Device boxes are in pixel space. Hand centers are normalized to
//! `[0.0, 1.0]` relative to the frame, as hand-landmark models report them.

pub mod detection;
pub mod geometry;
pub mod record;
pub mod report;

pub use detection::*;
pub use geometry::*;
pub use record::*;
pub use report::*;
