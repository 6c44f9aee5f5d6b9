//! 2D raster surfaces the effect draws onto.
//!
//! A [`RasterSurface`] accepts tightly packed RGBA8 rows, the same layout the
//! ripple kernel writes. [`Canvas`] is the in-memory implementation and
//! [`SharedCanvas`] lets a host read it while the frame loop runs elsewhere.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use image::RgbaImage;

use crate::kernel::BYTES_PER_PIXEL;

/// Errors produced by raster surfaces.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Image data has {got} bytes, expected {expected} for {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        got: usize,
    },
    #[error("Canvas lock poisoned")]
    Poisoned,
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A canvas-like 2D target.
pub trait RasterSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Blit a `width × height` RGBA8 block at `(dx, dy)`, clipped to the surface.
    fn put_image_data(
        &mut self,
        data: &[u8],
        width: u32,
        height: u32,
        dx: u32,
        dy: u32,
    ) -> Result<(), SurfaceError>;
}

/// In-memory RGBA8 canvas.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Create a transparent-black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Write the canvas as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), SurfaceError> {
        self.image
            .save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        Ok(())
    }
}

impl RasterSurface for Canvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn put_image_data(
        &mut self,
        data: &[u8],
        width: u32,
        height: u32,
        dx: u32,
        dy: u32,
    ) -> Result<(), SurfaceError> {
        let row_bytes = width as usize * BYTES_PER_PIXEL;
        let expected = row_bytes * height as usize;
        if data.len() != expected {
            return Err(SurfaceError::SizeMismatch {
                width,
                height,
                expected,
                got: data.len(),
            });
        }

        let canvas_width = self.image.width();
        let canvas_height = self.image.height();
        if dx >= canvas_width || dy >= canvas_height {
            return Ok(());
        }

        let copy_cols = width.min(canvas_width - dx) as usize;
        let copy_rows = height.min(canvas_height - dy) as usize;
        let dst_stride = canvas_width as usize * BYTES_PER_PIXEL;
        let dst: &mut [u8] = &mut self.image;

        for row in 0..copy_rows {
            let src_start = row * row_bytes;
            let dst_start = (dy as usize + row) * dst_stride + dx as usize * BYTES_PER_PIXEL;
            let len = copy_cols * BYTES_PER_PIXEL;
            dst[dst_start..dst_start + len].copy_from_slice(&data[src_start..src_start + len]);
        }

        Ok(())
    }
}

/// A [`Canvas`] shared between the frame loop and its host.
#[derive(Debug, Clone)]
pub struct SharedCanvas {
    inner: Arc<Mutex<Canvas>>,
    width: u32,
    height: u32,
}

impl SharedCanvas {
    pub fn new(canvas: Canvas) -> Self {
        let width = canvas.width();
        let height = canvas.height();
        Self {
            inner: Arc::new(Mutex::new(canvas)),
            width,
            height,
        }
    }

    /// Lock the canvas for reading.
    pub fn lock(&self) -> Result<MutexGuard<'_, Canvas>, SurfaceError> {
        self.inner.lock().map_err(|_| SurfaceError::Poisoned)
    }

    /// Copy out the current contents.
    pub fn snapshot(&self) -> Result<Canvas, SurfaceError> {
        Ok(self.lock()?.clone())
    }
}

impl RasterSurface for SharedCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn put_image_data(
        &mut self,
        data: &[u8],
        width: u32,
        height: u32,
        dx: u32,
        dy: u32,
    ) -> Result<(), SurfaceError> {
        self.lock()?.put_image_data(data, width, height, dx, dy)
    }
}
