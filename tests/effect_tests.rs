//! Integration tests for the frame loop and the `start` entry point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ripple_effect::kernel::{ripple_pixel, unpack4x8};
use ripple_effect::{
    run_frames, start, Canvas, CpuRipple, EffectConfig, EffectError, FixedRate, GpuError,
    RenderStep, Unpaced,
};

fn gpu_config(dim: u32) -> EffectConfig {
    EffectConfig {
        dim,
        target_fps: None,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_start_without_device_returns_no_handle() {
    let config = EffectConfig {
        backends: wgpu::Backends::empty(),
        ..Default::default()
    };
    let result = start(config).await;
    assert!(matches!(
        result,
        Err(EffectError::Gpu(GpuError::DeviceUnavailable))
    ));
}

#[tokio::test]
async fn test_start_rejects_bad_dim() {
    let result = start(EffectConfig {
        dim: 1023,
        ..Default::default()
    })
    .await;
    assert!(matches!(result, Err(EffectError::Config(_))));
}

#[tokio::test]
async fn test_start_runs_bounded_frames() {
    let config = EffectConfig {
        max_frames: Some(4),
        ..gpu_config(64)
    };
    let Ok(handle) = start(config).await else {
        return;
    };

    let report = handle.join().expect("frame loop failed");
    assert_eq!(report.frames, 4);
    assert_eq!(report.last_ticks, 4);
    assert_eq!(report.dim, 64);
    assert!(report.adapter.is_some());
}

#[tokio::test]
async fn test_stop_ends_the_loop() {
    let Ok(handle) = start(gpu_config(64)).await else {
        return;
    };

    std::thread::sleep(Duration::from_millis(50));
    handle.stop();
    let report = handle.join().expect("frame loop failed");
    assert_eq!(report.last_ticks as u64, report.frames);
}

#[tokio::test]
async fn test_handle_canvas_shows_frames() {
    let config = EffectConfig {
        max_frames: Some(2),
        ..gpu_config(32)
    };
    let Ok(handle) = start(config).await else {
        return;
    };
    let canvas = handle.canvas().clone();
    let report = handle.join().expect("frame loop failed");
    assert_eq!(report.frames, 2);

    let snapshot = canvas.snapshot().unwrap();
    let [r, _, _, a] = snapshot.pixel(16, 16);
    let [er, _, _, _] = unpack4x8(ripple_pixel(16, 16, 2, 32));
    assert!(r.abs_diff(er) <= 1);
    assert_eq!(a, 255);
}

#[test]
fn test_stop_flag_from_another_thread() {
    let active = Arc::new(AtomicBool::new(true));
    let flag = active.clone();

    let worker = std::thread::spawn(move || {
        let mut step = CpuRipple::new(16).unwrap();
        let mut canvas = Canvas::new(16, 16);
        let mut scheduler = FixedRate::new(Duration::from_millis(2));
        run_frames(&mut step, &mut canvas, &mut scheduler, &flag, None)
    });

    std::thread::sleep(Duration::from_millis(30));
    active.store(false, Ordering::Release);

    let report = worker.join().unwrap().unwrap();
    assert!(report.frames >= 1);
    assert_eq!(report.last_ticks as u64, report.frames);
}

#[test]
fn test_loop_counter_has_no_skips() {
    let mut step = CpuRipple::new(16).unwrap();
    let mut canvas = Canvas::new(16, 16);
    let active = AtomicBool::new(true);

    let report = run_frames(&mut step, &mut canvas, &mut Unpaced, &active, Some(25)).unwrap();
    assert_eq!(report.frames, 25);
    assert_eq!(step.ticks(), 25);
}
