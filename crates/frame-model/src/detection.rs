//! Per-frame detector output consumed by the usage engine.
//!
//! Detection streams are stored as JSONL: an optional `# {header}` line
//! followed by one [`FrameDetections`] object per frame, in frame order.

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, FrameSize, Point2D};

/// Class of handheld device the detector reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Phone,
    TapToPay,
}

impl DeviceKind {
    /// Map a detector class id to a device kind (0 = tap-to-pay, 1 = phone).
    pub fn from_class_id(class_id: u32) -> Option<Self> {
        match class_id {
            0 => Some(Self::TapToPay),
            1 => Some(Self::Phone),
            _ => None,
        }
    }

    /// Detector class id for this kind.
    pub fn class_id(&self) -> u32 {
        match self {
            Self::TapToPay => 0,
            Self::Phone => 1,
        }
    }

    /// Human-readable label used in reports and overlays.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TapToPay => "TAP TO PAY DEVICE",
            Self::Phone => "phone",
        }
    }
}

/// A single device box from the object detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDetection {
    pub kind: DeviceKind,

    /// Bounding box in pixel space.
    pub bbox: BoundingBox,

    /// Detector confidence in `[0, 1]`.
    pub confidence: f64,
}

impl DeviceDetection {
    pub fn new(kind: DeviceKind, bbox: BoundingBox, confidence: f64) -> Self {
        Self {
            kind,
            bbox,
            confidence,
        }
    }

    /// Box center in pixel space.
    pub fn center(&self) -> Point2D {
        self.bbox.center()
    }
}

/// A single hand from the landmark model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    /// Palm center, normalized to `[0, 1]` relative to the frame.
    pub center: Point2D,

    /// Detector confidence, when the landmark model reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl HandObservation {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            center: Point2D::new(x, y),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Everything the detectors produced for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDetections {
    /// Zero-based frame index.
    #[serde(rename = "frame")]
    pub frame_index: u64,

    /// Presentation timestamp in seconds.
    #[serde(rename = "t")]
    pub timestamp_secs: f64,

    /// Device boxes in detector output order.
    #[serde(default)]
    pub devices: Vec<DeviceDetection>,

    /// Hands in landmark-model output order.
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

impl FrameDetections {
    /// An empty frame (nothing detected).
    pub fn empty(frame_index: u64, timestamp_secs: f64) -> Self {
        Self {
            frame_index,
            timestamp_secs,
            devices: vec![],
            hands: vec![],
        }
    }

    pub fn with_device(mut self, device: DeviceDetection) -> Self {
        self.devices.push(device);
        self
    }

    pub fn with_hand(mut self, hand: HandObservation) -> Self {
        self.hands.push(hand);
        self
    }

    /// Devices of one kind, preserving detector order.
    pub fn devices_of(&self, kind: DeviceKind) -> impl Iterator<Item = &DeviceDetection> {
        self.devices.iter().filter(move |d| d.kind == kind)
    }

    /// Drop devices and hands below the given confidence thresholds.
    ///
    /// Hands without a reported confidence are kept.
    pub fn retain_confident(&mut self, device_threshold: f64, hand_threshold: f64) {
        self.devices.retain(|d| d.confidence >= device_threshold);
        self.hands
            .retain(|h| h.confidence.map_or(true, |c| c >= hand_threshold));
    }
}

/// Stream metadata written as the first (comment) line of a detection file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Path of the video the detections were computed from.
    #[serde(default)]
    pub source_video: Option<String>,

    /// Frame dimensions in pixels.
    pub frame_width: u32,
    pub frame_height: u32,

    /// Nominal frame rate.
    pub fps: f64,

    /// Total frames in the source, if known.
    #[serde(default)]
    pub frame_count: Option<u64>,
}

impl DetectionStreamHeader {
    pub const SCHEMA_VERSION: &'static str = "1.0";

    pub fn new(frame_width: u32, frame_height: u32, fps: f64) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION.to_string(),
            source_video: None,
            frame_width,
            frame_height,
            fps,
            frame_count: None,
        }
    }

    pub fn frame_size(&self) -> FrameSize {
        FrameSize::new(self.frame_width, self.frame_height)
    }
}

/// A parsed detection file: optional header plus frames.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionStream {
    pub header: Option<DetectionStreamHeader>,
    pub frames: Vec<FrameDetections>,
}

/// Parse frames from JSONL content (one JSON object per line).
///
/// Blank lines and `#` comment lines are skipped.
pub fn parse_frames(jsonl: &str) -> Result<Vec<FrameDetections>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Parse a detection file, reading the header from the first `# {...}` line if present.
pub fn parse_stream(content: &str) -> Result<DetectionStream, serde_json::Error> {
    let header = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.strip_prefix('#'))
        .map(str::trim)
        .filter(|rest| rest.starts_with('{'))
        .map(serde_json::from_str::<DetectionStreamHeader>)
        .transpose()?;

    Ok(DetectionStream {
        header,
        frames: parse_frames(content)?,
    })
}

/// Serialize frames to JSONL format, with an optional header comment line.
pub fn serialize_frames(
    header: Option<&DetectionStreamHeader>,
    frames: &[FrameDetections],
) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    if let Some(header) = header {
        output.push_str("# ");
        output.push_str(&serde_json::to_string(header)?);
        output.push('\n');
    }
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f64) -> DeviceDetection {
        DeviceDetection::new(
            DeviceKind::Phone,
            BoundingBox::new(x1, y1, x2, y2),
            confidence,
        )
    }

    #[test]
    fn test_class_id_mapping() {
        assert_eq!(DeviceKind::from_class_id(0), Some(DeviceKind::TapToPay));
        assert_eq!(DeviceKind::from_class_id(1), Some(DeviceKind::Phone));
        assert_eq!(DeviceKind::from_class_id(7), None);
        assert_eq!(DeviceKind::Phone.class_id(), 1);
        assert_eq!(DeviceKind::TapToPay.label(), "TAP TO PAY DEVICE");
    }

    #[test]
    fn test_frame_wire_format() {
        let line = r#"{"frame":3,"t":0.1,"devices":[{"kind":"tap_to_pay","bbox":{"x1":0.0,"y1":0.0,"x2":10.0,"y2":10.0},"confidence":0.9}],"hands":[{"center":{"x":0.5,"y":0.5}}]}"#;
        let frame: FrameDetections = serde_json::from_str(line).unwrap();
        assert_eq!(frame.frame_index, 3);
        assert_eq!(frame.devices[0].kind, DeviceKind::TapToPay);
        assert_eq!(frame.devices[0].center(), Point2D::new(5.0, 5.0));
        assert_eq!(frame.hands[0].confidence, None);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let frame: FrameDetections = serde_json::from_str(r#"{"frame":0,"t":0.0}"#).unwrap();
        assert!(frame.devices.is_empty());
        assert!(frame.hands.is_empty());
    }

    #[test]
    fn test_devices_of_keeps_detector_order() {
        let frame = FrameDetections::empty(0, 0.0)
            .with_device(phone(0.0, 0.0, 10.0, 10.0, 0.9))
            .with_device(DeviceDetection::new(
                DeviceKind::TapToPay,
                BoundingBox::new(5.0, 5.0, 6.0, 6.0),
                0.8,
            ))
            .with_device(phone(20.0, 20.0, 30.0, 30.0, 0.7));

        let phones: Vec<_> = frame.devices_of(DeviceKind::Phone).collect();
        assert_eq!(phones.len(), 2);
        assert_eq!(phones[0].confidence, 0.9);
        assert_eq!(phones[1].confidence, 0.7);
    }

    #[test]
    fn test_retain_confident() {
        let mut frame = FrameDetections::empty(0, 0.0)
            .with_device(phone(0.0, 0.0, 10.0, 10.0, 0.4))
            .with_device(phone(0.0, 0.0, 10.0, 10.0, 0.6))
            .with_hand(HandObservation::new(0.1, 0.1).with_confidence(0.5))
            .with_hand(HandObservation::new(0.2, 0.2).with_confidence(0.9))
            .with_hand(HandObservation::new(0.3, 0.3));

        frame.retain_confident(0.5, 0.7);

        assert_eq!(frame.devices.len(), 1);
        assert_eq!(frame.devices[0].confidence, 0.6);
        assert_eq!(frame.hands.len(), 2);
    }

    #[test]
    fn test_stream_roundtrip_with_header() {
        let mut header = DetectionStreamHeader::new(640, 480, 30.0);
        header.source_video = Some("clip.mp4".to_string());
        let frames = vec![
            FrameDetections::empty(0, 0.0),
            FrameDetections::empty(1, 0.5)
                .with_device(phone(1.0, 2.0, 3.0, 4.0, 0.8))
                .with_hand(HandObservation::new(0.25, 0.75)),
        ];

        let content = serialize_frames(Some(&header), &frames).unwrap();
        assert!(content.starts_with("# {"));

        let stream = parse_stream(&content).unwrap();
        assert_eq!(stream.header, Some(header));
        assert_eq!(stream.frames, frames);
    }

    #[test]
    fn test_parse_stream_without_header() {
        let content = "\n{\"frame\":0,\"t\":0.0}\n# trailing note\n";
        let stream = parse_stream(content).unwrap();
        assert!(stream.header.is_none());
        assert_eq!(stream.frames.len(), 1);
    }
}
