//! Ripple Effect
//!
//! A GPU compute-shader visual effect rendered headlessly onto an in-memory canvas.
//!
//! # Features
//!
//! - Procedural radial ripple kernel in WGSL, dispatched via wgpu in 16×16 tiles
//! - Host-side reference of the same kernel for testing without a device
//! - Per-frame dispatch / copy / map / blit cycle with a single frame in flight
//! - Stoppable frame loop with fixed-rate or unpaced scheduling
//! - Canvas snapshots as PNG and run reports as JSON

pub mod effect;
pub mod gpu;
pub mod kernel;
pub mod surface;

// Re-export commonly used types
pub use effect::{
    run_frames, start, CpuRipple, EffectConfig, EffectDriver, EffectError, EffectHandle,
    FixedRate, FrameCounter, FrameScheduler, RenderStep, RunReport, Unpaced,
};
pub use gpu::{ContextOptions, GpuContext, GpuError, RippleError, RippleKernel};
pub use kernel::{ripple_grey, ripple_pixel, DispatchGrid, DEFAULT_DIM, WORKGROUP_SIZE};
pub use surface::{Canvas, RasterSurface, SharedCanvas, SurfaceError};
