//! gifscrub composites animated GIFs into full-canvas frames and plays them back with scrubbing.
//!
//! The public API is session-oriented:
//!
//! - Fetch bytes through a [`ByteSource`] and decode them with a [`FrameDecoder`]
//! - [`composite`] logical frames into [`Bitmap`]s with normalized delays
//! - Classify the animation with [`PolicyThresholds`] and drive a [`Player`] from a
//!   [`FrameTimer`], writing each visible frame to a [`RenderSurface`]
//!
//! [`load_session`] runs all of the above with stage-annotated errors.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod config;
mod foundation;
mod playback;
mod policy;
mod render;
mod session;

pub use crate::foundation::core::{Bitmap, BoundingBox, Canvas, LoopMode, SourceLoopCount};
pub use crate::foundation::error::{ScrubError, ScrubResult};

pub use crate::assets::decode::{DecodedGif, FrameDecoder, GifDecoder};
pub use crate::assets::frame::{DisposalMethod, LogicalFrame};
pub use crate::assets::signature::{
    GIF_SIGNATURES, SIGNATURE_PREVIEW_BYTES, ensure_gif_signature, first_bytes_hex,
    has_gif_signature,
};
pub use crate::assets::source::{ByteSource, FileSource, MemorySource};
pub use crate::compose::compositor::{
    CompositedAnimation, MAX_COMPOSITED_BYTES, composite, derive_canvas,
};
pub use crate::compose::delay::{
    DEFAULT_DELAY_MS, MAX_DELAY_MS, MIN_DELAY_MS, normalize_delay_ms, normalize_raw_delay,
};
pub use crate::config::{DEFAULT_SHIFT_JUMP, DEFAULT_SPEED_OPTIONS, PlayerConfig};
pub use crate::playback::control::{
    ControlState, Key, KeyInput, PlayerCommand, SpeedDescriptor, SpeedOption, command_for_key,
    speed_options,
};
pub use crate::playback::display::{FrameChange, SimulatedDisplay};
pub use crate::playback::engine::Player;
pub use crate::playback::state::{
    CatchUp, MIN_EFFECTIVE_DELAY_MS, PlayerState, REDUCED_MODE_MIN_DELAY_MS, catch_up,
    effective_delay_ms,
};
pub use crate::playback::timer::{FrameTimer, ManualTimer, TickToken};
pub use crate::policy::performance::{
    LARGE_ESTIMATED_BYTES, LARGE_FRAME_COUNT, LARGE_PIXELS, PolicyDecision, PolicyThresholds,
    REDUCED_MODE_WARNING, classify,
};
pub use crate::render::surface::{MemorySurface, RenderSurface};
pub use crate::session::{
    LoadedSession, PreparedAnimation, STAGE_DECODE, STAGE_FETCH, STAGE_MOUNT, STAGE_START,
    decode_animation, load_session, prepare_animation,
};
