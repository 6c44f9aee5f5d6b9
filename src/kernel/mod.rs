//! Host-side definition of the ripple kernel.
//!
//! The WGSL shader in `gpu/shaders/ripple.wgsl` and the functions here compute
//! the same per-pixel value, so the pattern can be checked without a device.
//!
//! - `ripple_grey` gives the raw traveling wave in [-1, 1]
//! - `pack4x8_unorm` packs four unorm channels into one word, channel 0 low
//! - `ripple_pixel` combines both into the word the kernel stores

pub mod grid;

pub use grid::{DispatchGrid, GridError, Tile};

/// Default raster width and height.
pub const DEFAULT_DIM: u32 = 1024;

/// Workgroup tile edge; each workgroup covers `WORKGROUP_SIZE²` pixels.
pub const WORKGROUP_SIZE: u32 = 16;

/// Bytes per packed pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Distance divisor controlling ring spacing.
const RING_SCALE: f32 = 10.0;

/// Frame-counter divisor controlling wave speed.
const TICK_SCALE: f32 = 7.0;

/// Traveling radial wave at pixel `(x, y)` for frame counter `ticks`.
pub fn ripple_grey(x: u32, y: u32, ticks: u32, dim: u32) -> f32 {
    let half = dim as f32 / 2.0;
    let fx = x as f32 - half;
    let fy = y as f32 - half;
    let d = (fx * fx + fy * fy).sqrt();
    (d / RING_SCALE - ticks as f32 / TICK_SCALE).cos()
}

/// Map a value in [-1, 1] onto the unorm range [0, 1].
#[inline]
pub fn signed_to_unorm(v: f32) -> f32 {
    v * 0.5 + 0.5
}

/// Quantise one unorm channel the way WGSL `pack4x8unorm` does.
#[inline]
pub fn unorm_to_u8(v: f32) -> u8 {
    (0.5 + 255.0 * v.clamp(0.0, 1.0)).floor() as u8
}

/// Pack four unorm channels into one word, channel 0 in the lowest byte.
pub fn pack4x8_unorm(channels: [f32; 4]) -> u32 {
    u32::from_le_bytes(channels.map(unorm_to_u8))
}

/// Split a packed word back into its `[r, g, b, a]` bytes.
#[inline]
pub fn unpack4x8(word: u32) -> [u8; 4] {
    word.to_le_bytes()
}

/// Packed grayscale word the kernel stores for pixel `(x, y)`.
pub fn ripple_pixel(x: u32, y: u32, ticks: u32, dim: u32) -> u32 {
    let grey = signed_to_unorm(ripple_grey(x, y, ticks, dim));
    pack4x8_unorm([grey, grey, grey, 1.0])
}

/// Flat buffer index for pixel `(x, y)`.
#[inline]
pub fn pixel_index(x: u32, y: u32, dim: u32) -> usize {
    x as usize + y as usize * dim as usize
}

/// Fill `out` with one full frame, walking the same tile grid as the GPU dispatch.
///
/// `out` must hold exactly `dim * dim` words.
pub fn render_into(out: &mut [u32], ticks: u32, grid: &DispatchGrid) {
    let dim = grid.dim();
    debug_assert_eq!(out.len(), grid.pixel_count());

    for tile in grid.tiles() {
        for (x, y) in tile.pixels() {
            out[pixel_index(x, y, dim)] = ripple_pixel(x, y, ticks, dim);
        }
    }
}

/// Render one full frame on the host.
pub fn render_frame(ticks: u32, grid: &DispatchGrid) -> Vec<u32> {
    let mut out = vec![0u32; grid.pixel_count()];
    render_into(&mut out, ticks, grid);
    out
}
