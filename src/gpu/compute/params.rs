//! Uniform parameter structs for the ripple shader.
//!
//! These structs must match the WGSL shader definitions exactly.

/// WGSL: `var<uniform> ticks: u32`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TicksUniform {
    pub ticks: u32,
}

impl TicksUniform {
    pub fn new(ticks: u32) -> Self {
        Self { ticks }
    }

    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;
}
