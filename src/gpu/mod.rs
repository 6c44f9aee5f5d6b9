//! GPU compute using wgpu.
//!
//! Provides headless device acquisition and the ripple compute kernel.

pub mod compute;
pub mod context;
pub mod layouts;

pub use compute::{RippleError, RippleKernel};
pub use context::{ContextOptions, GpuContext, GpuError};
