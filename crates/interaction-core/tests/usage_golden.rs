use std::path::PathBuf;

use holdwatch_frame_model::detection::{parse_stream, DetectionStream};
use holdwatch_interaction_core::analyzer::UsageAnalyzer;
use holdwatch_interaction_core::config::InteractionConfig;
use holdwatch_interaction_core::sequencer::FrameSequencer;

fn load_fixture_stream() -> DetectionStream {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-detections.jsonl");

    let content = std::fs::read_to_string(path).expect("fixture detections should be readable");
    parse_stream(&content).expect("fixture detections should parse")
}

fn analyze_fixture(config: InteractionConfig) -> (UsageAnalyzer, Vec<String>) {
    let stream = load_fixture_stream();
    let header = stream.header.expect("fixture should carry a header");
    let mut analyzer =
        UsageAnalyzer::new(config.clone(), header.frame_size()).expect("valid analyzer");

    let mut rows = vec![];
    for mut frame in stream.frames {
        frame.retain_confident(
            config.phone_confidence_threshold,
            config.hand_confidence_threshold,
        );
        let record = analyzer.process_frame(&frame).expect("frame should process").record;
        rows.push(format!(
            "{}|{}|{}|{}|{:.3}|{:.3}",
            record.frame_index,
            u8::from(record.active_phone_usage),
            u8::from(record.active_tap_to_pay_usage),
            u8::from(record.phone_in_motion),
            record.current_hold_secs,
            record.total_hold_secs
        ));
    }
    (analyzer, rows)
}

fn fnv1a_64(input: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in input.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[test]
fn default_fixture_signature_is_stable() {
    let (_, rows) = analyze_fixture(InteractionConfig::default());

    assert_eq!(rows.len(), 12);
    assert_eq!(rows[4], "4|1|0|1|0.500|0.500");
    assert_eq!(rows[6], "6|0|1|1|0.000|0.750");
    assert_eq!(fnv1a_64(&rows.join("\n")), 0x2d0924402b521543);
}

#[test]
fn default_fixture_sessions_and_statistics() {
    let (analyzer, _) = analyze_fixture(InteractionConfig::default());
    let summary = analyzer.summary();

    let spans: Vec<(u64, u64)> = summary
        .sessions
        .iter()
        .map(|s| (s.start_frame_index, s.end_frame_index))
        .collect();
    assert_eq!(spans, vec![(2, 4), (7, 7), (10, 11)]);
    assert_eq!(summary.sessions[0].duration, 0.5);
    assert_eq!(summary.sessions[1].duration, 0.0);
    assert_eq!(summary.total_usage_time, 0.75);

    assert_eq!(summary.statistics.total_frames, 12);
    assert_eq!(summary.statistics.active_frames, 6);
    assert_eq!(summary.statistics.usage_percentage, 50.0);
    assert_eq!(summary.statistics.total_phone_hold_time, 1.25);
    assert_eq!(summary.statistics.current_phone_hold_time, 0.25);
}

#[test]
fn shuffled_fixture_matches_in_order_run() {
    let mut stream = load_fixture_stream();
    let header = stream.header.clone().expect("fixture should carry a header");
    stream.frames.swap(2, 5);
    stream.frames.swap(7, 8);

    let mut sequencer = FrameSequencer::new(0, 4);
    let mut ordered = vec![];
    for frame in stream.frames {
        ordered.extend(sequencer.push(frame).expect("sequencer accepts fixture frames"));
    }
    ordered.extend(sequencer.finish());

    let config = InteractionConfig::default();
    let mut analyzer = UsageAnalyzer::new(config.clone(), header.frame_size()).unwrap();
    for mut frame in ordered {
        frame.retain_confident(
            config.phone_confidence_threshold,
            config.hand_confidence_threshold,
        );
        analyzer.process_frame(&frame).unwrap();
    }

    let (reference, _) = analyze_fixture(config);
    assert_eq!(analyzer.summary(), reference.summary());
}
