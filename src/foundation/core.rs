use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{ScrubError, ScrubResult};

/// Full-canvas dimensions, fixed for the lifetime of an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Build a canvas, rejecting a zero-area size.
    pub fn new(width: u32, height: u32) -> ScrubResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScrubError::validation(format!(
                "canvas must be at least 1x1, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// `width * height`.
    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Length in bytes of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Whether `bbox` lies entirely inside the canvas.
    pub fn contains(self, bbox: BoundingBox) -> bool {
        bbox.left >= 0
            && bbox.top >= 0
            && bbox.width > 0
            && bbox.height > 0
            && i64::from(bbox.left) + i64::from(bbox.width) <= i64::from(self.width)
            && i64::from(bbox.top) + i64::from(bbox.height) <= i64::from(self.height)
    }
}

/// Region of the canvas covered by one logical frame's patch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    /// Left offset in pixels.
    pub left: i32,
    /// Top offset in pixels.
    pub top: i32,
    /// Width in pixels. Must be > 0 to be composited.
    pub width: i32,
    /// Height in pixels. Must be > 0 to be composited.
    pub height: i32,
}

impl BoundingBox {
    /// Build a bounding box.
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        i64::from(self.left) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        i64::from(self.top) + i64::from(self.height)
    }

    /// Expected patch length in bytes (RGBA8), zero for degenerate boxes.
    pub fn patch_len(self) -> usize {
        if self.width <= 0 || self.height <= 0 {
            return 0;
        }
        self.width as usize * self.height as usize * 4
    }
}

/// Full-canvas straight-alpha RGBA8 bitmap, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Fully transparent bitmap covering `canvas`.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.rgba_len()],
        }
    }

    /// Size of this bitmap as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// RGBA value at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// How many times the source animation asks to be played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLoopCount {
    /// Play the whole sequence this many times (always >= 1).
    Finite(u32),
    /// Repeat forever.
    Infinite,
}

impl Default for SourceLoopCount {
    fn default() -> Self {
        Self::Finite(1)
    }
}

impl SourceLoopCount {
    /// Map a declared iteration count: `None` (undeclared) plays once, `Some(0)` is infinite.
    pub fn from_declared(iterations: Option<u32>) -> Self {
        match iterations {
            None => Self::Finite(1),
            Some(0) => Self::Infinite,
            Some(n) => Self::Finite(n),
        }
    }
}

impl fmt::Display for SourceLoopCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Infinite => f.write_str("infinite"),
        }
    }
}

/// User-selected loop policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Honor the source animation's loop count.
    #[default]
    Source,
    /// Loop forever regardless of the source.
    Infinite,
    /// Play through once and stop at the last frame.
    None,
}

impl LoopMode {
    /// Stable lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Infinite => "infinite",
            Self::None => "none",
        }
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoopMode {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(Self::Source),
            "infinite" => Ok(Self::Infinite),
            "none" => Ok(Self::None),
            other => Err(ScrubError::validation(format!(
                "unknown loop mode '{other}' (expected source, infinite or none)"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
