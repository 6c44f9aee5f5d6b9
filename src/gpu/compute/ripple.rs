//! Ripple kernel dispatch and staged readback.

use std::sync::Arc;
use wgpu::{BindGroup, Buffer, Device, Queue};

use super::buffers::RippleBuffers;
use super::params::TicksUniform;
use super::pipelines::RipplePipeline;
use crate::kernel::{DispatchGrid, GridError};

/// Errors that can occur while running the ripple kernel.
#[derive(Debug, thiserror::Error)]
pub enum RippleError {
    #[error("Invalid raster dimension: {0}")]
    InvalidDimension(#[from] GridError),
    #[error("Pixel buffer of {size} bytes exceeds the device storage limit of {limit} bytes")]
    BufferTooLarge { size: u64, limit: u64 },
    #[error("GPU buffer mapping failed: {0}")]
    BufferMapFailed(String),
    #[error("Device poll failed: {0}")]
    DevicePoll(String),
}

/// Unmaps the staging buffer when dropped, including during unwind.
struct StagingMapping<'a> {
    buffer: &'a Buffer,
}

impl<'a> StagingMapping<'a> {
    fn new(buffer: &'a Buffer) -> Self {
        Self { buffer }
    }
}

impl Drop for StagingMapping<'_> {
    fn drop(&mut self) {
        // Also cancels a map request that never completed.
        self.buffer.unmap();
    }
}

/// Device-side ripple kernel: pipeline, buffers and the reusable bind group.
pub struct RippleKernel {
    device: Arc<Device>,
    queue: Arc<Queue>,
    grid: DispatchGrid,
    pipeline: RipplePipeline,
    buffers: RippleBuffers,
    bind_group: BindGroup,
}

impl RippleKernel {
    /// Compile the kernel and allocate its buffers for a `dim × dim` raster.
    pub fn new(device: Arc<Device>, queue: Arc<Queue>, dim: u32) -> Result<Self, RippleError> {
        let grid = DispatchGrid::new(dim)?;

        let size = grid.byte_size();
        let limit = device.limits().max_storage_buffer_binding_size as u64;
        if size > limit {
            return Err(RippleError::BufferTooLarge { size, limit });
        }

        let pipeline = RipplePipeline::new(&device, dim);
        let buffers = RippleBuffers::new(&device, size);
        let bind_group = pipeline.create_bind_group(&device, &buffers);

        log::debug!(
            "Ripple kernel ready: {dim}x{dim}, {:?} workgroups, {size} byte buffers",
            grid.workgroups()
        );

        Ok(Self {
            device,
            queue,
            grid,
            pipeline,
            buffers,
            bind_group,
        })
    }

    pub fn dim(&self) -> u32 {
        self.grid.dim()
    }

    /// Record dispatch + copy-to-staging, upload `ticks`, and submit.
    ///
    /// The staging buffer is never mapped here: `read_frame` releases it
    /// before returning, on every path.
    pub fn submit(&self, ticks: u32) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ripple_encoder"),
            });

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("ripple_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            let (x, y, z) = self.grid.workgroups();
            pass.dispatch_workgroups(x, y, z);
        }

        encoder.copy_buffer_to_buffer(
            &self.buffers.pixels,
            0,
            &self.buffers.staging,
            0,
            self.buffers.size(),
        );

        // Queued writes land before the next submission on this queue.
        self.queue.write_buffer(
            &self.buffers.uniform,
            0,
            bytemuck::bytes_of(&TicksUniform::new(ticks)),
        );
        self.queue.submit(Some(encoder.finish()));
    }

    /// Map the staging buffer, hand its bytes to `f`, then unmap.
    ///
    /// Blocks until the device has finished the last submission.
    pub fn read_frame<R>(&mut self, f: impl FnOnce(&[u8]) -> R) -> Result<R, RippleError> {
        let slice = self.buffers.staging.slice(..);

        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        let _mapping = StagingMapping::new(&self.buffers.staging);

        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RippleError::DevicePoll(e.to_string()))?;

        rx.recv()
            .map_err(|e| RippleError::BufferMapFailed(e.to_string()))?
            .map_err(|e| RippleError::BufferMapFailed(format!("{:?}", e)))?;

        // Declared after `_mapping`, so the view is released before the unmap.
        let data = slice.get_mapped_range();
        let result = f(&data);
        Ok(result)
    }

    /// Run one frame and return the packed words.
    pub fn render(&mut self, ticks: u32) -> Result<Vec<u32>, RippleError> {
        self.submit(ticks);
        self.read_frame(|bytes| {
            bytes
                .chunks_exact(4)
                .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect()
        })
    }
}
