use crate::foundation::core::BoundingBox;

/// GIF disposal method applied after a frame has been shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisposalMethod {
    /// Code 0: no disposal specified, treated as leave-in-place.
    #[default]
    Unspecified,
    /// Code 1: leave the frame's pixels for the next frame to draw over.
    Keep,
    /// Code 2: clear the frame's bounding box to transparent.
    Background,
    /// Code 3: restore the canvas to its state before this frame was drawn.
    Previous,
}

impl DisposalMethod {
    /// Map a raw GIF disposal code. Reserved codes (4..=7) behave as [`Self::Unspecified`].
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Keep,
            2 => Self::Background,
            3 => Self::Previous,
            _ => Self::Unspecified,
        }
    }

    /// Raw GIF disposal code.
    pub fn code(self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::Keep => 1,
            Self::Background => 2,
            Self::Previous => 3,
        }
    }
}

/// One undecoded GIF sub-image as yielded by the decoder adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogicalFrame {
    /// Region the patch covers.
    pub bbox: BoundingBox,
    /// Frame delay in hundredths of a second, unvalidated.
    pub delay_raw: i32,
    /// What to do with this frame's pixels before the next frame is drawn.
    pub disposal: DisposalMethod,
    /// RGBA8 bytes for the bounding box. May be shorter than expected on malformed input.
    pub patch: Vec<u8>,
}

impl LogicalFrame {
    /// Convenience constructor.
    pub fn new(
        bbox: BoundingBox,
        delay_raw: i32,
        disposal: DisposalMethod,
        patch: Vec<u8>,
    ) -> Self {
        Self {
            bbox,
            delay_raw,
            disposal,
            patch,
        }
    }

    /// A frame whose patch fills `bbox` with a single RGBA color.
    pub fn solid(
        bbox: BoundingBox,
        rgba: [u8; 4],
        delay_raw: i32,
        disposal: DisposalMethod,
    ) -> Self {
        let patch = rgba.repeat(bbox.patch_len() / 4);
        Self::new(bbox, delay_raw, disposal, patch)
    }
}
