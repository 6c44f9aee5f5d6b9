//! GPU-backed effect driver.

use super::{EffectConfig, EffectError, FrameCounter, RenderStep};
use crate::gpu::{GpuContext, RippleKernel};
use crate::surface::RasterSurface;

/// Owns the device, the ripple kernel and the frame counter.
pub struct EffectDriver {
    ctx: GpuContext,
    kernel: RippleKernel,
    counter: FrameCounter,
}

impl EffectDriver {
    /// Acquire a device and build every GPU resource the effect needs.
    ///
    /// Fails before allocating anything if the config is invalid or no
    /// device is available.
    pub async fn new(config: &EffectConfig) -> Result<Self, EffectError> {
        config.validate()?;
        let ctx = GpuContext::with_options(config.to_context_options()).await?;
        Self::from_context(ctx, config.dim)
    }

    /// Build the driver on an existing context.
    pub fn from_context(ctx: GpuContext, dim: u32) -> Result<Self, EffectError> {
        let kernel = RippleKernel::new(ctx.device.clone(), ctx.queue.clone(), dim)?;
        log::info!("Ripple effect initialised at {dim}x{dim}");

        Ok(Self {
            ctx,
            kernel,
            counter: FrameCounter::new(),
        })
    }

    /// Get GPU adapter info.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.ctx.adapter_info()
    }
}

impl RenderStep for EffectDriver {
    fn dim(&self) -> u32 {
        self.kernel.dim()
    }

    fn ticks(&self) -> u32 {
        self.counter.get()
    }

    fn render_frame(&mut self, surface: &mut dyn RasterSurface) -> Result<u32, EffectError> {
        let ticks = self.counter.advance();
        let dim = self.kernel.dim();

        self.kernel.submit(ticks);
        self.kernel
            .read_frame(|bytes| surface.put_image_data(bytes, dim, dim, 0, 0))??;

        Ok(ticks)
    }
}
