use std::io::Cursor;

use crate::{
    assets::frame::{DisposalMethod, LogicalFrame},
    foundation::core::{BoundingBox, SourceLoopCount},
    foundation::error::{ScrubError, ScrubResult},
};

/// Decoder output: logical frames in stream order plus the declared loop count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedGif {
    /// Logical frames, one per GIF image descriptor.
    pub frames: Vec<LogicalFrame>,
    /// Loop count declared by the NETSCAPE application extension.
    pub loop_count: SourceLoopCount,
}

/// Turns raw GIF bytes into logical frames. Byte-level parsing lives behind this boundary.
pub trait FrameDecoder {
    /// Decode `bytes`. Zero frames is returned as-is; callers treat it as fatal.
    fn decode(&self, bytes: &[u8]) -> ScrubResult<DecodedGif>;
}

/// [`FrameDecoder`] backed by the `gif` crate with RGBA color output.
#[derive(Clone, Copy, Debug, Default)]
pub struct GifDecoder;

impl FrameDecoder for GifDecoder {
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn decode(&self, bytes: &[u8]) -> ScrubResult<DecodedGif> {
        let mut opts = gif::DecodeOptions::new();
        opts.set_color_output(gif::ColorOutput::RGBA);
        let mut decoder = opts
            .read_info(Cursor::new(bytes))
            .map_err(|e| ScrubError::decode(format!("read gif header: {e}")))?;

        let mut frames = Vec::new();
        loop {
            let index = frames.len();
            let next = decoder
                .read_next_frame()
                .map_err(|e| ScrubError::decode(format!("read frame {index}: {e}")))?;
            let Some(frame) = next else {
                break;
            };
            frames.push(LogicalFrame {
                bbox: BoundingBox::new(
                    i32::from(frame.left),
                    i32::from(frame.top),
                    i32::from(frame.width),
                    i32::from(frame.height),
                ),
                delay_raw: i32::from(frame.delay),
                disposal: disposal_from_gif(frame.dispose),
                patch: frame.buffer.to_vec(),
            });
        }

        let loop_count = loop_count_from_repeat(decoder.repeat());
        tracing::debug!(frames = frames.len(), %loop_count, "decoded logical frames");
        Ok(DecodedGif { frames, loop_count })
    }
}

fn disposal_from_gif(method: gif::DisposalMethod) -> DisposalMethod {
    match method {
        gif::DisposalMethod::Any => DisposalMethod::Unspecified,
        gif::DisposalMethod::Keep => DisposalMethod::Keep,
        gif::DisposalMethod::Background => DisposalMethod::Background,
        gif::DisposalMethod::Previous => DisposalMethod::Previous,
    }
}

// The `gif` crate reports a missing NETSCAPE extension as `Finite(0)`.
fn loop_count_from_repeat(repeat: gif::Repeat) -> SourceLoopCount {
    match repeat {
        gif::Repeat::Infinite => SourceLoopCount::Infinite,
        gif::Repeat::Finite(0) => SourceLoopCount::from_declared(None),
        gif::Repeat::Finite(n) => SourceLoopCount::from_declared(Some(u32::from(n))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
