//! GPU buffer management for the ripple kernel.

use wgpu::{Buffer, BufferUsages, Device};

use super::params::TicksUniform;

/// The three buffers the ripple kernel needs.
pub struct RippleBuffers {
    /// Frame counter, read by the kernel as `ticks`.
    pub uniform: Buffer,
    /// Packed pixels written by the kernel.
    pub pixels: Buffer,
    /// Host-mappable copy of `pixels`.
    pub staging: Buffer,
    size: u64,
}

impl RippleBuffers {
    /// Create all buffers for a frame of `size` bytes.
    pub fn new(device: &Device, size: u64) -> Self {
        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ripple_ticks"),
            size: TicksUniform::SIZE,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pixels = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ripple_pixels"),
            size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ripple_staging"),
            size,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            uniform,
            pixels,
            staging,
            size,
        }
    }

    /// Size in bytes of the pixel and staging buffers.
    pub fn size(&self) -> u64 {
        self.size
    }
}
