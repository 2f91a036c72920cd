//! Show a saved usage report.

use std::path::PathBuf;

pub fn run(path: PathBuf, frames: bool) -> anyhow::Result<()> {
    let report = super::load_report(&path)?;

    println!("Report: {}", path.display());
    println!("  Version: {}", report.version);
    println!("  Video: {}", report.video_path);
    if let Some(output) = &report.output_path {
        println!("  Output: {output}");
    }
    println!("  Processed: {}", report.processing_time);
    println!();

    println!("Frames:");
    println!("  Total: {}", report.total_frames);
    println!(
        "  Active phone usage: {} ({:.1}%)",
        report.active_phone_usage_frames, report.phone_usage_percentage
    );
    println!("  Tap-to-pay usage: {}", report.tap_to_pay_usage_frames);
    println!();

    println!("Hold time:");
    println!("  Total: {:.2}s", report.statistics.total_phone_hold_time);
    println!(
        "  In progress at end: {:.2}s",
        report.statistics.current_phone_hold_time
    );
    println!();

    println!("Sessions: {}", report.usage_sessions.len());
    for (i, session) in report.usage_sessions.iter().enumerate() {
        println!(
            "  {}. {:.2}s - {:.2}s ({:.2}s, {} frames)",
            i + 1,
            session.start_time,
            session.end_time,
            session.duration,
            session.frame_span()
        );
    }
    println!("  Total usage time: {:.2}s", report.total_usage_time);

    if frames {
        println!();
        println!("Frame details:");
        for record in &report.frame_details {
            println!("  {}", serde_json::to_string(record)?);
        }
    }

    Ok(())
}
