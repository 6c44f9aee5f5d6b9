//! Host reference renderer.
//!
//! Runs the kernel from [`crate::kernel`] on the CPU. Used for tests, benches
//! and GPU parity checks; the effect never falls back to it on its own.

use super::{EffectError, FrameCounter, RenderStep};
use crate::kernel::{self, DispatchGrid};
use crate::surface::RasterSurface;

pub struct CpuRipple {
    grid: DispatchGrid,
    counter: FrameCounter,
    pixels: Vec<u32>,
}

impl CpuRipple {
    pub fn new(dim: u32) -> Result<Self, EffectError> {
        let grid = DispatchGrid::new(dim)?;
        Ok(Self {
            pixels: vec![0; grid.pixel_count()],
            grid,
            counter: FrameCounter::new(),
        })
    }

    /// Packed words of the last rendered frame.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

impl RenderStep for CpuRipple {
    fn dim(&self) -> u32 {
        self.grid.dim()
    }

    fn ticks(&self) -> u32 {
        self.counter.get()
    }

    fn render_frame(&mut self, surface: &mut dyn RasterSurface) -> Result<u32, EffectError> {
        let ticks = self.counter.advance();
        kernel::render_into(&mut self.pixels, ticks, &self.grid);

        let dim = self.grid.dim();
        surface.put_image_data(bytemuck::cast_slice(&self.pixels), dim, dim, 0, 0)?;

        Ok(ticks)
    }
}
