//! Example: Render the ripple effect headlessly and save snapshots.
//!
//! Renders a few seconds of animation, writes a PNG every 30 frames and a
//! JSON report of each batch.
//!
//! Run with:
//!     cargo run --example render_frames --features tokio

use std::path::Path;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use ripple_effect::{run_frames, Canvas, EffectConfig, EffectDriver, RenderStep};

const BATCH: u64 = 30;
const BATCHES: usize = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Ripple Effect - Headless Render Example");
    println!("=======================================\n");

    let config = EffectConfig::default();
    let mut driver = EffectDriver::new(&config)
        .await
        .context("failed to set up the GPU")?;

    println!("  GPU: {}", driver.adapter_info().name);
    println!("  Resolution: {0}x{0}", driver.dim());
    println!("  Target FPS: {:?}\n", config.target_fps);

    let out_dir = Path::new("ripple_frames");
    std::fs::create_dir_all(out_dir)?;

    let mut canvas = Canvas::new(config.dim, config.dim);
    let mut scheduler = config.scheduler();
    let active = AtomicBool::new(true);
    let mut reports = Vec::with_capacity(BATCHES);

    for _ in 0..BATCHES {
        let mut report = run_frames(
            &mut driver,
            &mut canvas,
            scheduler.as_mut(),
            &active,
            Some(BATCH),
        )?;
        report.adapter = Some(driver.adapter_info().name);

        let path = out_dir.join(format!("frame_{:05}.png", report.last_ticks));
        canvas.save_png(&path)?;
        println!(
            "  Frame {:>4}: {:.2} ms/frame -> {}",
            report.last_ticks,
            report.mean_frame_ms,
            path.display()
        );

        reports.push(report);
    }

    let report_path = out_dir.join("report.json");
    std::fs::write(&report_path, serde_json::to_string_pretty(&reports)?)?;

    println!("\nDone! Output: {}", out_dir.display());
    println!("Report: {}", report_path.display());

    Ok(())
}
