//! Validate a detection stream before analysis.

use std::path::PathBuf;

use holdwatch_common::clock::FrameClock;
use holdwatch_frame_model::detection::DetectionStream;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating detections at: {}", path.display());

    let stream = super::load_detections(&path)?;

    match &stream.header {
        Some(header) => {
            println!("  Schema version: {}", header.schema_version);
            if let Some(video) = &header.source_video {
                println!("  Source video: {video}");
            }
            println!(
                "  Frame size: {}x{} @ {}fps",
                header.frame_width, header.frame_height, header.fps
            );
        }
        None => println!("  Header: missing"),
    }
    println!("  Frames: {}", stream.frames.len());

    let issues = check_stream(&stream);
    if issues.is_empty() {
        println!("\nDetection stream is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Analysis may reject or misread this stream.",
            issues.len()
        );
    }

    Ok(())
}

/// Problems that would make the stream unusable or misleading for analysis.
pub fn check_stream(stream: &DetectionStream) -> Vec<String> {
    let mut issues = vec![];

    let clock = match &stream.header {
        None => {
            issues.push("no header line; frame size is unknown".to_string());
            None
        }
        Some(header) => {
            if header.frame_width == 0 || header.frame_height == 0 {
                issues.push(format!(
                    "frame size {}x{} is empty",
                    header.frame_width, header.frame_height
                ));
            }
            match FrameClock::new(header.fps) {
                Ok(clock) => Some(clock),
                Err(e) => {
                    issues.push(e.to_string());
                    None
                }
            }
        }
    };

    let mut previous: Option<(u64, f64)> = None;
    for frame in &stream.frames {
        let index = frame.frame_index;

        if !frame.timestamp_secs.is_finite() {
            issues.push(format!("frame {index}: timestamp is not finite"));
        }
        if let Some((last_index, last_secs)) = previous {
            if index <= last_index {
                issues.push(format!("frame {index}: index follows {last_index}"));
            } else if index > last_index + 1 {
                let missing = index - last_index - 1;
                issues.push(format!(
                    "frame {index}: {missing} frame(s) missing after frame {last_index}"
                ));
            }
            if frame.timestamp_secs < last_secs {
                issues.push(format!(
                    "frame {index}: timestamp {}s precedes {}s",
                    frame.timestamp_secs, last_secs
                ));
            }
        }
        previous = Some((index, frame.timestamp_secs));

        if let Some(clock) = &clock {
            let expected = clock.timestamp_secs(index);
            if (frame.timestamp_secs - expected).abs() > clock.frame_interval_secs() {
                issues.push(format!(
                    "frame {index}: timestamp {}s is more than one frame from {expected:.3}s",
                    frame.timestamp_secs
                ));
            }
        }

        for device in &frame.devices {
            if !(0.0..=1.0).contains(&device.confidence) {
                issues.push(format!(
                    "frame {index}: {} confidence {} outside [0, 1]",
                    device.kind.label(),
                    device.confidence
                ));
            }
            let bbox = device.bbox;
            if !bbox.is_finite() || bbox.x2 < bbox.x1 || bbox.y2 < bbox.y1 {
                issues.push(format!(
                    "frame {index}: {} box ({}, {}, {}, {}) is malformed",
                    device.kind.label(),
                    bbox.x1,
                    bbox.y1,
                    bbox.x2,
                    bbox.y2
                ));
            }
        }

        for hand in &frame.hands {
            if let Some(c) = hand.confidence {
                if !(0.0..=1.0).contains(&c) {
                    issues.push(format!("frame {index}: hand confidence {c} outside [0, 1]"));
                }
            }
            let inside = (0.0..=1.0).contains(&hand.center.x) && (0.0..=1.0).contains(&hand.center.y);
            if !inside {
                issues.push(format!(
                    "frame {index}: hand center ({}, {}) is not normalized",
                    hand.center.x, hand.center.y
                ));
            }
        }
    }

    issues
}
