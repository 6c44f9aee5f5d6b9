//! GPU compute shader modules for the ripple effect.
//!
//! Thin device adapter around the kernel defined in [`crate::kernel`].

mod buffers;
mod params;
mod pipelines;

pub mod ripple;

pub use params::TicksUniform;
pub use pipelines::{DIM_CONSTANT, ENTRY_POINT};
pub use ripple::{RippleError, RippleKernel};
