use std::sync::Arc;

use crate::{
    assets::decode::FrameDecoder,
    assets::signature::ensure_gif_signature,
    assets::source::ByteSource,
    compose::compositor::composite,
    config::PlayerConfig,
    foundation::core::{Bitmap, Canvas, SourceLoopCount},
    foundation::error::{ScrubError, ScrubResult},
    playback::control::{ControlState, KeyInput, SpeedOption, command_for_key, speed_options},
    playback::engine::Player,
    playback::timer::FrameTimer,
    policy::performance::PolicyDecision,
    render::surface::RenderSurface,
};

/// Stage labels reported by [`ScrubError::Stage`].
pub const STAGE_FETCH: &str = "fetching gif bytes";
/// See [`STAGE_FETCH`].
pub const STAGE_DECODE: &str = "decoding gif";
/// See [`STAGE_FETCH`].
pub const STAGE_MOUNT: &str = "mounting ui";
/// See [`STAGE_FETCH`].
pub const STAGE_START: &str = "starting player";

/// Fully composited animation, ready to hand to a [`Player`].
#[derive(Clone, Debug)]
pub struct PreparedAnimation {
    /// Logical screen size.
    pub canvas: Canvas,
    /// One full-canvas bitmap per logical frame.
    pub frames: Arc<[Bitmap]>,
    /// Normalized delay per frame.
    pub delays_ms: Arc<[u32]>,
    /// Loop count declared by the source.
    pub source_loop_count: SourceLoopCount,
}

impl PreparedAnimation {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false` for a successfully prepared animation.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sum of the normalized delays of one pass.
    pub fn cycle_ms(&self) -> u64 {
        self.delays_ms.iter().map(|d| u64::from(*d)).sum()
    }
}

/// Decode and composite bytes that already passed the signature check.
pub fn decode_animation(
    bytes: &[u8],
    decoder: &dyn FrameDecoder,
) -> ScrubResult<PreparedAnimation> {
    let decoded = decoder.decode(bytes)?;
    if decoded.frames.is_empty() {
        return Err(ScrubError::EmptyAnimation);
    }
    let composed = composite(&decoded.frames)?;
    Ok(PreparedAnimation {
        canvas: composed.canvas,
        frames: composed.frames.into(),
        delays_ms: composed.delays_ms.into(),
        source_loop_count: decoded.loop_count,
    })
}

/// Signature check, decode and composite in one call, without stage wrapping.
pub fn prepare_animation(
    bytes: &[u8],
    decoder: &dyn FrameDecoder,
) -> ScrubResult<PreparedAnimation> {
    ensure_gif_signature(bytes)?;
    decode_animation(bytes, decoder)
}

/// A mounted playback session.
pub struct LoadedSession<S, T> {
    /// The running player.
    pub player: Player<S, T>,
    /// Outcome of the performance policy.
    pub policy: PolicyDecision,
    /// Logical screen size.
    pub canvas: Canvas,
    /// Loop count declared by the source.
    pub source_loop_count: SourceLoopCount,
    /// Speed selector entries.
    pub speed_options: Vec<SpeedOption>,
    shift_jump: u32,
}

impl<S: RenderSurface, T: FrameTimer> LoadedSession<S, T> {
    /// Route a key press to the player. Returns whether the key was handled.
    pub fn handle_key(&mut self, input: &KeyInput) -> ScrubResult<bool> {
        let Some(cmd) = command_for_key(input, self.shift_jump) else {
            return Ok(false);
        };
        self.player.dispatch(cmd)?;
        Ok(true)
    }

    /// Snapshot for the UI layer.
    pub fn control_state(&self) -> ControlState {
        self.player.control_state()
    }
}

/// Fetch, validate, decode, composite and mount an animation.
///
/// Failures are wrapped as [`ScrubError::Stage`] naming the stage and `id`. The surface is
/// acquired through `acquire_surface` once the canvas size is known.
#[tracing::instrument(skip(source, decoder, acquire_surface, timer, config))]
pub fn load_session<S, T, F>(
    source: &dyn ByteSource,
    id: &str,
    decoder: &dyn FrameDecoder,
    acquire_surface: F,
    timer: T,
    config: &PlayerConfig,
) -> ScrubResult<LoadedSession<S, T>>
where
    S: RenderSurface,
    T: FrameTimer,
    F: FnOnce(Canvas) -> ScrubResult<S>,
{
    let at = move |stage: &'static str| move |e: ScrubError| e.at_stage(stage, Some(id));

    config.validate()?;
    let bytes = source.fetch(id).map_err(at(STAGE_FETCH))?;
    ensure_gif_signature(&bytes).map_err(at(STAGE_FETCH))?;

    let anim = decode_animation(&bytes, decoder).map_err(at(STAGE_DECODE))?;
    drop(bytes);

    let policy = config
        .policy
        .classify(anim.len(), anim.canvas.width, anim.canvas.height);
    let surface = acquire_surface(anim.canvas).map_err(at(STAGE_MOUNT))?;

    let start = || -> ScrubResult<Player<S, T>> {
        let mut player = Player::new(
            anim.frames.clone(),
            anim.delays_ms.clone(),
            anim.source_loop_count,
            policy.reduced_mode,
            surface,
            timer,
        )?;
        player.set_loop_mode(config.initial_loop_mode);
        player.set_playback_rate(config.initial_playback_rate);
        if config.autoplay {
            player.mount()?;
        } else {
            player.show_current()?;
        }
        Ok(player)
    };
    let player = start().map_err(at(STAGE_START))?;

    tracing::debug!(
        frames = anim.len(),
        width = anim.canvas.width,
        height = anim.canvas.height,
        reduced = policy.reduced_mode,
        "session loaded"
    );
    Ok(LoadedSession {
        player,
        policy,
        canvas: anim.canvas,
        source_loop_count: anim.source_loop_count,
        speed_options: speed_options(&config.speed_options),
        shift_jump: config.shift_jump,
    })
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
