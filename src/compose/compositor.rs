use crate::{
    assets::frame::{DisposalMethod, LogicalFrame},
    compose::delay::normalize_raw_delay,
    foundation::core::{Bitmap, BoundingBox, Canvas},
    foundation::error::{ScrubError, ScrubResult},
};

/// Upper bound on the memory of one composition pass: every emitted bitmap plus the work buffer.
pub const MAX_COMPOSITED_BYTES: u64 = 4 * 1024 * 1024 * 1024;

/// Result of a composition pass: one full-canvas bitmap and one delay per logical frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositedAnimation {
    /// Canvas shared by every frame.
    pub canvas: Canvas,
    /// Visible state after each frame is drawn, before its disposal.
    pub frames: Vec<Bitmap>,
    /// Normalized per-frame delays in milliseconds.
    pub delays_ms: Vec<u32>,
}

impl CompositedAnimation {
    /// Number of composited frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false for a successfully composited animation.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Canvas size covering every frame's bounding box, floored at 1x1.
pub fn derive_canvas(frames: &[LogicalFrame]) -> Canvas {
    let (mut width, mut height) = (0i64, 0i64);
    for frame in frames {
        width = width.max(frame.bbox.right());
        height = height.max(frame.bbox.bottom());
    }
    let max = i64::from(u32::MAX);
    Canvas {
        width: width.clamp(1, max) as u32,
        height: height.clamp(1, max) as u32,
    }
}

/// Composite logical frames, in order, into full-canvas bitmaps.
///
/// Patches replace destination pixels (no blending). Short patches are zero-padded. Disposal is
/// applied after each frame's bitmap has been emitted, so emitted bitmaps never change.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn composite(frames: &[LogicalFrame]) -> ScrubResult<CompositedAnimation> {
    if frames.is_empty() {
        return Err(ScrubError::EmptyAnimation);
    }

    let canvas = derive_canvas(frames);
    let culprit = extent_frame(frames, canvas);
    let alloc_err = |index: usize, what: &str| {
        ScrubError::composition(
            index,
            format!(
                "canvas {}x{} cannot be allocated ({what})",
                canvas.width, canvas.height
            ),
        )
    };

    let total = (frames.len() as u64 + 1).saturating_mul(canvas.pixel_count().saturating_mul(4));
    if total > MAX_COMPOSITED_BYTES {
        return Err(alloc_err(
            culprit,
            &format!("{total} bytes for {} frames exceeds {MAX_COMPOSITED_BYTES}", frames.len()),
        ));
    }

    let mut work = WorkBuffer::new(canvas).map_err(|e| alloc_err(culprit, &e))?;
    let mut out = Vec::new();
    out.try_reserve_exact(frames.len())
        .map_err(|e| alloc_err(culprit, &e.to_string()))?;
    let mut delays_ms = Vec::with_capacity(frames.len());

    for (index, frame) in frames.iter().enumerate() {
        let bbox = frame.bbox;
        if bbox.width <= 0 || bbox.height <= 0 {
            return Err(ScrubError::composition(
                index,
                format!("invalid dimensions {}x{}", bbox.width, bbox.height),
            ));
        }

        let before = match frame.disposal {
            DisposalMethod::Previous => Some(work.snapshot().map_err(|e| alloc_err(index, &e))?),
            _ => None,
        };

        let expected = bbox.patch_len();
        if frame.patch.len() < expected {
            tracing::warn!(
                frame = index,
                patch_len = frame.patch.len(),
                expected,
                "short patch buffer, zero-padding missing pixels"
            );
        }

        work.put_patch(bbox, &frame.patch).map_err(|detail| {
            ScrubError::composition(
                index,
                format!(
                    "composite failed (dims={}x{}, left={}, top={}, patchLen={}, expected={expected}): {detail}",
                    bbox.width,
                    bbox.height,
                    bbox.left,
                    bbox.top,
                    frame.patch.len(),
                ),
            )
        })?;

        out.push(work.to_bitmap().map_err(|e| alloc_err(index, &e))?);
        if frame.delay_raw <= 0 {
            tracing::debug!(frame = index, delay_raw = frame.delay_raw, "using default delay");
        }
        delays_ms.push(normalize_raw_delay(frame.delay_raw));

        match frame.disposal {
            DisposalMethod::Unspecified | DisposalMethod::Keep => {}
            DisposalMethod::Background => work.clear_rect(bbox),
            DisposalMethod::Previous => {
                if let Some(pixels) = before {
                    work.restore(pixels);
                }
            }
        }
    }

    tracing::debug!(
        width = canvas.width,
        height = canvas.height,
        frames = out.len(),
        "composited animation"
    );
    Ok(CompositedAnimation {
        canvas,
        frames: out,
        delays_ms,
    })
}

// Index of the first frame reaching the canvas edge, i.e. one that determines its size.
fn extent_frame(frames: &[LogicalFrame], canvas: Canvas) -> usize {
    frames
        .iter()
        .position(|f| {
            f.bbox.right() >= i64::from(canvas.width) || f.bbox.bottom() >= i64::from(canvas.height)
        })
        .unwrap_or(0)
}

fn try_copy(src: &[u8]) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(src.len()).map_err(|e| e.to_string())?;
    buf.extend_from_slice(src);
    Ok(buf)
}

/// The single mutable full-canvas accumulator used during a composition pass.
struct WorkBuffer {
    canvas: Canvas,
    data: Vec<u8>,
}

impl WorkBuffer {
    fn new(canvas: Canvas) -> Result<Self, String> {
        let len = (canvas.width as usize)
            .checked_mul(canvas.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| "size overflows usize".to_owned())?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| e.to_string())?;
        data.resize(len, 0);
        Ok(Self { canvas, data })
    }

    fn stride(&self) -> usize {
        self.canvas.width as usize * 4
    }

    fn put_patch(&mut self, bbox: BoundingBox, patch: &[u8]) -> Result<(), String> {
        if !self.canvas.contains(bbox) {
            return Err(format!(
                "bounding box does not fit the {}x{} canvas",
                self.canvas.width, self.canvas.height
            ));
        }

        let row_len = bbox.width as usize * 4;
        let stride = self.stride();
        for row in 0..bbox.height as usize {
            let dst_start = (bbox.top as usize + row) * stride + bbox.left as usize * 4;
            let dst = &mut self.data[dst_start..dst_start + row_len];
            let src_start = row * row_len;
            let available = patch.len().saturating_sub(src_start).min(row_len);
            if available > 0 {
                dst[..available].copy_from_slice(&patch[src_start..src_start + available]);
            }
            dst[available..].fill(0);
        }
        Ok(())
    }

    fn clear_rect(&mut self, bbox: BoundingBox) {
        let stride = self.stride();
        let x0 = bbox.left.max(0) as usize;
        let y0 = bbox.top.max(0) as usize;
        let x1 = (bbox.right().max(0) as usize).min(self.canvas.width as usize);
        let y1 = (bbox.bottom().max(0) as usize).min(self.canvas.height as usize);
        if x0 >= x1 {
            return;
        }
        for y in y0..y1 {
            self.data[y * stride + x0 * 4..y * stride + x1 * 4].fill(0);
        }
    }

    fn snapshot(&self) -> Result<Vec<u8>, String> {
        try_copy(&self.data)
    }

    fn restore(&mut self, pixels: Vec<u8>) {
        self.data = pixels;
    }

    fn to_bitmap(&self) -> Result<Bitmap, String> {
        Ok(Bitmap {
            width: self.canvas.width,
            height: self.canvas.height,
            data: try_copy(&self.data)?,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
