use crate::{
    foundation::core::{Bitmap, Canvas},
    foundation::error::{ScrubError, ScrubResult},
};

/// Output surface sized exactly to the animation canvas.
///
/// Writing a full-canvas bitmap is the only operation the player needs.
pub trait RenderSurface {
    /// Surface dimensions.
    fn canvas(&self) -> Canvas;

    /// Replace the surface contents with `bitmap`.
    fn write_bitmap(&mut self, bitmap: &Bitmap) -> ScrubResult<()>;
}

/// In-memory RGBA8 surface, used by headless hosts and tests.
#[derive(Clone, Debug)]
pub struct MemorySurface {
    canvas: Canvas,
    pixels: Vec<u8>,
    writes: u64,
}

impl MemorySurface {
    /// Acquire a transparent surface for `canvas`.
    pub fn new(canvas: Canvas) -> ScrubResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(ScrubError::surface(format!(
                "cannot allocate a {}x{} surface",
                canvas.width, canvas.height
            )));
        }
        Ok(Self {
            canvas,
            pixels: vec![0; canvas.rgba_len()],
            writes: 0,
        })
    }

    /// Current pixel contents.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of bitmaps written so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl RenderSurface for MemorySurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn write_bitmap(&mut self, bitmap: &Bitmap) -> ScrubResult<()> {
        if bitmap.canvas() != self.canvas || bitmap.data.len() != self.pixels.len() {
            return Err(ScrubError::surface(format!(
                "bitmap {}x{} does not match {}x{} surface",
                bitmap.width, bitmap.height, self.canvas.width, self.canvas.height
            )));
        }
        self.pixels.copy_from_slice(&bitmap.data);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
