//! The effect driver: setup, per-frame render step, and the frame loop.
//!
//! Every frame runs the same cycle: bump the frame counter, dispatch the
//! kernel, copy to staging, map, blit onto the surface, unmap. Only one frame
//! is ever in flight.

pub mod cpu;
pub mod driver;
pub mod runner;
pub mod schedule;

pub use cpu::CpuRipple;
pub use driver::EffectDriver;
pub use runner::{run_frames, start, EffectHandle, RunReport};
pub use schedule::{FixedRate, FrameScheduler, Unpaced};

use crate::gpu::{ContextOptions, GpuError, RippleError};
use crate::kernel::{DispatchGrid, GridError, DEFAULT_DIM};
use crate::surface::{RasterSurface, SurfaceError};

/// Configuration for the ripple effect.
#[derive(Debug, Clone)]
pub struct EffectConfig {
    /// Raster width and height; must be a multiple of 16.
    pub dim: u32,
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    /// Frames per second for the loop, `None` renders back to back.
    pub target_fps: Option<u32>,
    /// Stop after this many frames, `None` runs until stopped.
    pub max_frames: Option<u64>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            dim: DEFAULT_DIM,
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            target_fps: Some(60),
            max_frames: None,
        }
    }
}

impl EffectConfig {
    /// Check the raster dimension and frame rate.
    pub fn validate(&self) -> Result<DispatchGrid, EffectError> {
        if self.target_fps == Some(0) {
            return Err(EffectError::ZeroFrameRate);
        }
        Ok(DispatchGrid::new(self.dim)?)
    }

    pub fn to_context_options(&self) -> ContextOptions {
        ContextOptions {
            backends: self.backends,
            power_preference: self.power_preference,
        }
    }

    /// Scheduler matching `target_fps`.
    pub fn scheduler(&self) -> Box<dyn FrameScheduler + Send> {
        match self.target_fps {
            Some(fps) if fps > 0 => Box::new(FixedRate::from_fps(fps)),
            _ => Box::new(Unpaced),
        }
    }
}

/// Errors that can occur while setting up or running the effect.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("Config error: {0}")]
    Config(#[from] GridError),
    #[error("Target frame rate must be non-zero")]
    ZeroFrameRate,
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("Ripple kernel error: {0}")]
    Ripple(#[from] RippleError),
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
    #[error("Failed to spawn frame loop: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Frame loop thread panicked")]
    LoopPanicked,
}

/// Frame counter fed to the kernel as `ticks`.
///
/// Starts at 0; the first rendered frame sees 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounter(u32);

impl FrameCounter {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Increment and return the new value. Wraps at `u32::MAX`.
    pub fn advance(&mut self) -> u32 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }
}

/// One step of the frame loop: render the next frame onto a surface.
pub trait RenderStep {
    /// Raster edge length this step renders.
    fn dim(&self) -> u32;

    /// Current frame counter value (0 before the first frame).
    fn ticks(&self) -> u32;

    /// Advance the counter, render, and blit at (0, 0). Returns the new counter.
    fn render_frame(&mut self, surface: &mut dyn RasterSurface) -> Result<u32, EffectError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = EffectConfig::default();
        assert_eq!(config.dim, 1024);
        assert_eq!(config.target_fps, Some(60));
        assert!(config.max_frames.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_unaligned_dim() {
        let config = EffectConfig {
            dim: 1000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EffectError::Config(GridError::NotTileAligned { dim: 1000, .. }))
        ));
    }

    #[test]
    fn test_config_rejects_zero_fps() {
        let config = EffectConfig {
            target_fps: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EffectError::ZeroFrameRate)));
    }

    #[test]
    fn test_frame_counter() {
        let mut counter = FrameCounter::new();
        assert_eq!(counter.get(), 0);
        assert_eq!(counter.advance(), 1);
        assert_eq!(counter.advance(), 2);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_frame_counter_wraps() {
        let mut counter = FrameCounter(u32::MAX);
        assert_eq!(counter.advance(), 0);
    }
}
