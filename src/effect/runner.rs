//! The frame loop and the host-facing entry point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::{EffectConfig, EffectDriver, EffectError, FrameScheduler, RenderStep};
use crate::surface::{Canvas, RasterSurface, SharedCanvas};

/// Summary of a finished frame loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub dim: u32,
    pub frames: u64,
    /// Frame counter value of the last rendered frame.
    pub last_ticks: u32,
    pub elapsed_secs: f64,
    pub mean_frame_ms: f64,
    pub adapter: Option<String>,
}

/// Render frames until `active` is cleared or `max_frames` is reached.
///
/// `active` is checked before waiting and again before rendering, so a stop
/// request is honoured within one frame. The first error ends the loop.
pub fn run_frames(
    step: &mut dyn RenderStep,
    surface: &mut dyn RasterSurface,
    scheduler: &mut dyn FrameScheduler,
    active: &AtomicBool,
    max_frames: Option<u64>,
) -> Result<RunReport, EffectError> {
    let started = Instant::now();
    let mut frames = 0u64;
    let mut busy_secs = 0.0f64;

    log::debug!("Frame loop started (max_frames: {:?})", max_frames);

    while active.load(Ordering::Acquire) {
        if max_frames.is_some_and(|max| frames >= max) {
            break;
        }

        scheduler.wait_for_frame();
        if !active.load(Ordering::Acquire) {
            break;
        }

        let frame_start = Instant::now();
        let ticks = step.render_frame(surface)?;
        busy_secs += frame_start.elapsed().as_secs_f64();
        frames += 1;

        log::trace!("Rendered frame {ticks}");
    }

    let elapsed_secs = started.elapsed().as_secs_f64();
    let mean_frame_ms = if frames > 0 {
        busy_secs * 1000.0 / frames as f64
    } else {
        0.0
    };

    log::debug!("Frame loop stopped after {frames} frame(s)");

    Ok(RunReport {
        dim: step.dim(),
        frames,
        last_ticks: step.ticks(),
        elapsed_secs,
        mean_frame_ms,
        adapter: None,
    })
}

/// Set up the effect and start animating on a background thread.
///
/// Nothing is created and no thread is spawned unless the config is valid
/// and a GPU device was acquired.
pub async fn start(config: EffectConfig) -> Result<EffectHandle, EffectError> {
    let mut driver = EffectDriver::new(&config).await?;
    let adapter = driver.adapter_info().name;

    let canvas = SharedCanvas::new(Canvas::new(config.dim, config.dim));
    let active = Arc::new(AtomicBool::new(true));

    let mut surface = canvas.clone();
    let flag = active.clone();
    let thread = std::thread::Builder::new()
        .name("ripple-frame-loop".into())
        .spawn(move || {
            let mut scheduler = config.scheduler();
            let result = run_frames(
                &mut driver,
                &mut surface,
                scheduler.as_mut(),
                &flag,
                config.max_frames,
            );
            flag.store(false, Ordering::Release);
            result.map(|report| RunReport {
                adapter: Some(adapter),
                ..report
            })
        })?;

    Ok(EffectHandle {
        canvas,
        active,
        thread: Some(thread),
    })
}

/// A running effect: its canvas and a way to stop it.
pub struct EffectHandle {
    canvas: SharedCanvas,
    active: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<RunReport, EffectError>>>,
}

impl EffectHandle {
    /// The surface the effect draws onto.
    pub fn canvas(&self) -> &SharedCanvas {
        &self.canvas
    }

    /// Ask the loop to stop after the current frame.
    pub fn stop(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
            && self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Wait for the loop to finish and return its report.
    ///
    /// Does not stop the loop; call [`stop`](Self::stop) first unless
    /// `max_frames` bounds it.
    pub fn join(mut self) -> Result<RunReport, EffectError> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| EffectError::LoopPanicked)?,
            None => Ok(RunReport::default()),
        }
    }
}

impl Drop for EffectHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
