//! Compute pipeline creation for the ripple kernel.

use wgpu::{BindGroup, BindGroupLayout, ComputePipeline, Device, ShaderModule, ShaderStages};

use super::buffers::RippleBuffers;
use super::params::TicksUniform;
use crate::gpu::layouts::BindGroupLayoutBuilder;

/// Shader entry point.
pub const ENTRY_POINT: &str = "ripple";

/// Name of the pipeline-overridable raster dimension.
pub const DIM_CONSTANT: &str = "dim";

/// Compiled ripple pipeline and its bind group layout.
pub struct RipplePipeline {
    pub layout: BindGroupLayout,
    pub pipeline: ComputePipeline,
}

impl RipplePipeline {
    /// Compile the shader and build the pipeline for a `dim × dim` raster.
    pub fn new(device: &Device, dim: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ripple_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/ripple.wgsl").into()),
        });

        let layout = BindGroupLayoutBuilder::new("ripple_layout")
            .uniform(0, ShaderStages::COMPUTE, TicksUniform::SIZE)
            .storage(1, ShaderStages::COMPUTE, false)
            .build(device);

        let pipeline = Self::create_pipeline(device, &shader, &layout, dim);

        Self { layout, pipeline }
    }

    fn create_pipeline(
        device: &Device,
        shader: &ShaderModule,
        layout: &BindGroupLayout,
        dim: u32,
    ) -> ComputePipeline {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ripple_pipeline_layout"),
            bind_group_layouts: &[layout],
            immediate_size: 0,
        });

        let constants = [(DIM_CONSTANT, f64::from(dim))];

        device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("ripple_pipeline"),
            layout: Some(&pipeline_layout),
            module: shader,
            entry_point: Some(ENTRY_POINT),
            compilation_options: wgpu::PipelineCompilationOptions {
                constants: &constants,
                ..Default::default()
            },
            cache: None,
        })
    }

    /// Bind the uniform to slot 0 and the pixel buffer to slot 1.
    pub fn create_bind_group(&self, device: &Device, buffers: &RippleBuffers) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ripple_bind_group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers.uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.pixels.as_entire_binding(),
                },
            ],
        })
    }
}
