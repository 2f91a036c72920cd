//! Run the usage engine over a detection stream.

use std::path::PathBuf;

use holdwatch_common::clock::{ProgressMeter, RecordingClock};
use holdwatch_common::config::{AppConfig, TimerClock};
use holdwatch_common::error::HoldwatchError;
use holdwatch_frame_model::record::FrameRecord;
use holdwatch_frame_model::report::UsageReport;
use holdwatch_interaction_core::analyzer::UsageAnalyzer;
use holdwatch_interaction_core::config::InteractionConfig;
use holdwatch_interaction_core::sequencer::FrameSequencer;

/// Frames the reorder buffer may hold while waiting for a gap.
const MAX_REORDER_FRAMES: usize = 256;

/// Log progress every this many frames.
const PROGRESS_EVERY: u64 = 100;

/// Command-line overrides for the analysis settings in the config file.
#[derive(Debug, Default, clap::Args)]
pub struct AnalyzeOverrides {
    /// Minimum device detection confidence [0.0, 1.0]
    #[arg(long = "phone-conf")]
    pub phone_confidence: Option<f64>,

    /// Minimum hand detection confidence [0.0, 1.0]
    #[arg(long = "hand-conf")]
    pub hand_confidence: Option<f64>,

    /// Maximum hand-to-device distance for a hold (pixels)
    #[arg(long)]
    pub distance_threshold: Option<f64>,

    /// Number of recent positions used for motion detection
    #[arg(long)]
    pub min_motion_frames: Option<usize>,

    /// Average per-frame movement that counts as motion (pixels)
    #[arg(long)]
    pub motion_threshold: Option<f64>,

    /// Inactivity length that drives the temporal filter (frames)
    #[arg(long)]
    pub max_inactive_frames: Option<usize>,
}

impl AnalyzeOverrides {
    pub fn apply(&self, config: &mut InteractionConfig) {
        if let Some(v) = self.phone_confidence {
            config.phone_confidence_threshold = v;
        }
        if let Some(v) = self.hand_confidence {
            config.hand_confidence_threshold = v;
        }
        if let Some(v) = self.distance_threshold {
            config.distance_threshold_px = v;
        }
        if let Some(v) = self.min_motion_frames {
            config.min_motion_frames = v;
        }
        if let Some(v) = self.motion_threshold {
            config.motion_threshold = v;
        }
        if let Some(v) = self.max_inactive_frames {
            config.max_inactive_frames = v;
        }
    }
}

pub fn run(
    path: PathBuf,
    app: &AppConfig,
    overrides: AnalyzeOverrides,
    wall_clock_timer: bool,
    report_path: Option<PathBuf>,
    no_report: bool,
) -> anyhow::Result<()> {
    println!("Analyzing detections at: {}", path.display());

    let stream = super::load_detections(&path)?;
    let header = stream.header.ok_or_else(|| {
        HoldwatchError::detection("stream has no header line; frame size is unknown")
    })?;

    let mut config = InteractionConfig::from(&app.analysis);
    overrides.apply(&mut config);
    if wall_clock_timer {
        config.timer_clock = TimerClock::Wall;
    }

    println!(
        "  Frame size: {}x{} @ {}fps",
        header.frame_width, header.frame_height, header.fps
    );
    println!("  Loaded {} frames", stream.frames.len());

    let first_index = stream
        .frames
        .iter()
        .map(|f| f.frame_index)
        .min()
        .unwrap_or(0);
    let mut sequencer = FrameSequencer::new(first_index, MAX_REORDER_FRAMES);
    let mut ordered = Vec::with_capacity(stream.frames.len());
    for frame in stream.frames {
        ordered.extend(sequencer.push(frame)?);
    }
    ordered.extend(sequencer.finish());

    let mut analyzer = UsageAnalyzer::new(config.clone(), header.frame_size())?;
    let clock = RecordingClock::start();
    let mut meter = ProgressMeter::new(PROGRESS_EVERY);
    let total = ordered.len();
    let mut records: Vec<FrameRecord> = Vec::with_capacity(total);

    tracing::info!(
        frames = total,
        timer_clock = ?config.timer_clock,
        distance_threshold_px = config.distance_threshold_px,
        "Starting analysis"
    );

    for mut frame in ordered {
        frame.retain_confident(
            config.phone_confidence_threshold,
            config.hand_confidence_threshold,
        );
        let analyzed = match config.timer_clock {
            TimerClock::Video => analyzer.process_frame(&frame)?,
            TimerClock::Wall => analyzer.process_frame_at(&frame, clock.elapsed_secs())?,
        };
        records.push(analyzed.record);

        if let Some(rate) = meter.tick() {
            tracing::info!(
                processed = meter.processed(),
                total,
                frames_per_sec = rate,
                "Processed frames"
            );
        }
    }

    let summary = analyzer.summary();
    let stats = summary.statistics;

    println!();
    println!("Usage summary:");
    println!("  Total frames: {}", stats.total_frames);
    println!("  Active phone usage frames: {}", stats.active_frames);
    println!("  Phone usage: {:.1}%", stats.usage_percentage);
    println!("  Total hold time: {:.2}s", stats.total_phone_hold_time);
    if stats.current_phone_hold_time > 0.0 {
        println!(
            "  Hold in progress at end: {:.2}s",
            stats.current_phone_hold_time
        );
    }
    println!("  Usage sessions: {}", summary.sessions.len());
    for (i, session) in summary.sessions.iter().enumerate() {
        println!(
            "    {}. {:.2}s - {:.2}s ({:.2}s, frames {}-{})",
            i + 1,
            session.start_time,
            session.end_time,
            session.duration,
            session.start_frame_index,
            session.end_frame_index
        );
    }
    println!("  Total usage time: {:.2}s", summary.total_usage_time);

    let write_report = !no_report && (report_path.is_some() || app.output.generate_report);
    if write_report {
        let report_path = report_path.unwrap_or_else(|| app.output.report_path());
        let video_path = header
            .source_video
            .clone()
            .unwrap_or_else(|| path.display().to_string());
        let report = UsageReport::new(video_path, records, summary);
        super::save_report(&report, &report_path)?;
        println!("\n  Report saved to: {}", report_path.display());
    }

    println!(
        "\nAnalysis complete in {:.2}s (started {}).",
        clock.elapsed_secs(),
        clock.epoch_wall()
    );

    Ok(())
}
