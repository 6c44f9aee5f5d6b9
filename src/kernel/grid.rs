//! Dispatch grid geometry.
//!
//! A `dim × dim` raster is covered by `dim/16 × dim/16` workgroups, each a
//! 16×16 tile of invocations.

use super::WORKGROUP_SIZE;

/// Errors for raster dimensions the tile grid cannot cover.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Dimension must be non-zero")]
    ZeroDimension,
    #[error("Dimension {dim} is not a multiple of the workgroup size {workgroup}")]
    NotTileAligned { dim: u32, workgroup: u32 },
}

/// Workgroup grid for a square raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchGrid {
    dim: u32,
}

impl DispatchGrid {
    pub fn new(dim: u32) -> Result<Self, GridError> {
        if dim == 0 {
            return Err(GridError::ZeroDimension);
        }
        if dim % WORKGROUP_SIZE != 0 {
            return Err(GridError::NotTileAligned {
                dim,
                workgroup: WORKGROUP_SIZE,
            });
        }
        Ok(Self { dim })
    }

    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// Workgroup counts passed to `dispatch_workgroups`.
    pub fn workgroups(&self) -> (u32, u32, u32) {
        let n = self.dim / WORKGROUP_SIZE;
        (n, n, 1)
    }

    pub fn pixel_count(&self) -> usize {
        self.dim as usize * self.dim as usize
    }

    /// Size in bytes of one packed frame.
    pub fn byte_size(&self) -> u64 {
        self.pixel_count() as u64 * std::mem::size_of::<u32>() as u64
    }

    /// Iterate over every workgroup tile in dispatch order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> {
        let (wx, wy, _) = self.workgroups();
        (0..wy).flat_map(move |gy| (0..wx).map(move |gx| Tile { gx, gy }))
    }
}

/// One workgroup's 16×16 block of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub gx: u32,
    pub gy: u32,
}

impl Tile {
    /// Top-left pixel covered by this tile.
    pub fn origin(&self) -> (u32, u32) {
        (self.gx * WORKGROUP_SIZE, self.gy * WORKGROUP_SIZE)
    }

    /// Global pixel coordinates, local invocation order (x fastest).
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let (ox, oy) = self.origin();
        (0..WORKGROUP_SIZE)
            .flat_map(move |ly| (0..WORKGROUP_SIZE).map(move |lx| (ox + lx, oy + ly)))
    }
}
