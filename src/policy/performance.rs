use crate::foundation::error::{ScrubError, ScrubResult};

/// Frame count above which an animation plays in reduced mode.
pub const LARGE_FRAME_COUNT: u64 = 300;
/// Canvas area (width * height) above which an animation plays in reduced mode.
pub const LARGE_PIXELS: u64 = 1_500_000;
/// Estimated composited footprint (frames * width * height * 4) above which reduced mode engages.
pub const LARGE_ESTIMATED_BYTES: u64 = 256 * 1024 * 1024;

/// Advisory shown when reduced mode engages.
pub const REDUCED_MODE_WARNING: &str =
    "Large GIF detected: playback runs in reduced mode (capped frame rate, deferred scrubbing) to stay responsive.";

/// Tunable thresholds for [`PolicyThresholds::classify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PolicyThresholds {
    /// See [`LARGE_FRAME_COUNT`].
    pub large_frame_count: u64,
    /// See [`LARGE_PIXELS`].
    pub large_pixels: u64,
    /// See [`LARGE_ESTIMATED_BYTES`].
    pub large_estimated_bytes: u64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            large_frame_count: LARGE_FRAME_COUNT,
            large_pixels: LARGE_PIXELS,
            large_estimated_bytes: LARGE_ESTIMATED_BYTES,
        }
    }
}

/// Outcome of classifying an animation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PolicyDecision {
    /// Whether playback should run in reduced mode.
    pub reduced_mode: bool,
    /// User-facing advisory, present exactly when `reduced_mode` is set.
    pub warning_text: Option<String>,
}

impl PolicyThresholds {
    /// Reject thresholds that would classify every animation as large.
    pub fn validate(&self) -> ScrubResult<()> {
        if self.large_frame_count == 0
            || self.large_pixels == 0
            || self.large_estimated_bytes == 0
        {
            return Err(ScrubError::config("policy thresholds must be > 0"));
        }
        Ok(())
    }

    /// Classify an animation by frame count and canvas size. Pure.
    pub fn classify(&self, frame_count: usize, width: u32, height: u32) -> PolicyDecision {
        let frames = frame_count as u64;
        let pixels = u64::from(width).saturating_mul(u64::from(height));
        let estimated_bytes = frames.saturating_mul(pixels).saturating_mul(4);

        let is_large = frames > self.large_frame_count
            || pixels > self.large_pixels
            || estimated_bytes > self.large_estimated_bytes;

        if !is_large {
            return PolicyDecision {
                reduced_mode: false,
                warning_text: None,
            };
        }

        tracing::info!(frames, pixels, estimated_bytes, "large animation, using reduced mode");
        PolicyDecision {
            reduced_mode: true,
            warning_text: Some(REDUCED_MODE_WARNING.to_owned()),
        }
    }
}

/// Classify with the default thresholds.
pub fn classify(frame_count: usize, width: u32, height: u32) -> PolicyDecision {
    PolicyThresholds::default().classify(frame_count, width, height)
}

#[cfg(test)]
#[path = "../../tests/unit/policy/performance.rs"]
mod tests;
