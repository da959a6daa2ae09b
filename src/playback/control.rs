use crate::{
    foundation::core::LoopMode, playback::state::PlayerState,
    policy::performance::REDUCED_MODE_WARNING,
};

/// One command from the hosting UI layer. Each maps to exactly one player transition.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "cmd", content = "arg", rename_all = "snake_case")]
pub enum PlayerCommand {
    /// Start or resume playback.
    Play,
    /// Stop the clock.
    Pause,
    /// Play when paused, pause when playing.
    Toggle,
    /// Pause and move by a relative number of frames (clamped).
    Step(i64),
    /// Pause and jump to an absolute frame (clamped).
    Seek(i64),
    /// Change the loop policy.
    SetLoopMode(LoopMode),
    /// Change the speed multiplier; invalid rates are ignored.
    SetPlaybackRate(f64),
    /// Scrubber moved; deferred in reduced mode.
    ScrubPreview(i64),
    /// Scrubber released at the given frame.
    ScrubCommit(i64),
}

/// Keys the player reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Toggle playback.
    Space,
    /// Step backward.
    ArrowLeft,
    /// Step forward.
    ArrowRight,
    /// Anything else.
    Other,
}

/// A key press as seen by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// Which key.
    pub key: Key,
    /// Shift held: arrows jump by `shift_jump` frames.
    pub shift: bool,
    /// Another handler already consumed the event.
    pub default_prevented: bool,
    /// Focus is in a text input or other editable element.
    pub editable_target: bool,
}

impl KeyInput {
    /// Plain, unmodified key press.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            shift: false,
            default_prevented: false,
            editable_target: false,
        }
    }
}

/// Translate a key press into a command, or `None` if the player should not handle it.
pub fn command_for_key(input: &KeyInput, shift_jump: u32) -> Option<PlayerCommand> {
    if input.default_prevented || input.editable_target {
        return None;
    }
    let jump = if input.shift { i64::from(shift_jump) } else { 1 };
    match input.key {
        Key::Space => Some(PlayerCommand::Toggle),
        Key::ArrowLeft => Some(PlayerCommand::Step(-jump)),
        Key::ArrowRight => Some(PlayerCommand::Step(jump)),
        Key::Other => None,
    }
}

/// Snapshot of everything a UI layer renders.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ControlState {
    /// Visible frame index (0-based).
    pub current_frame: usize,
    /// Total frames.
    pub total_frames: usize,
    /// Playing flag.
    pub is_playing: bool,
    /// Active loop policy.
    pub loop_mode: LoopMode,
    /// Speed multiplier.
    pub playback_rate: f64,
    /// 1-based pass counter.
    pub effective_loop_iteration: u32,
    /// Reduced mode flag.
    pub reduced_mode: bool,
    /// Scrubber target not yet committed (reduced mode only).
    pub pending_scrub: Option<usize>,
    /// Reduced-mode advisory.
    pub warning_text: Option<String>,
    /// `"{current + 1}/{total}"`.
    pub frame_label: String,
    /// Upper bound of the scrubber range.
    pub scrubber_max: usize,
}

impl ControlState {
    pub(crate) fn from_state(state: &PlayerState, pending_scrub: Option<usize>) -> Self {
        Self {
            current_frame: state.current_frame,
            total_frames: state.total_frames,
            is_playing: state.is_playing,
            loop_mode: state.loop_mode,
            playback_rate: state.playback_rate,
            effective_loop_iteration: state.effective_loop_iteration,
            reduced_mode: state.reduced_mode,
            pending_scrub,
            warning_text: state.reduced_mode.then(|| REDUCED_MODE_WARNING.to_owned()),
            frame_label: format!("{}/{}", state.current_frame + 1, state.total_frames),
            scrubber_max: state.total_frames.saturating_sub(1),
        }
    }
}

/// How a speed option compares to the source timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedDescriptor {
    /// Rate below 1.
    Slower,
    /// Rate of exactly 1.
    Original,
    /// Rate above 1.
    Faster,
}

/// One entry of the speed selector.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SpeedOption {
    /// Multiplier.
    pub rate: f64,
    /// Percent label, e.g. `150%`.
    pub label: String,
    /// Comparison with the source timing.
    pub descriptor: SpeedDescriptor,
}

/// Build selector entries for `rates`, dropping invalid ones.
pub fn speed_options(rates: &[f64]) -> Vec<SpeedOption> {
    rates
        .iter()
        .copied()
        .filter(|r| r.is_finite() && *r > 0.0)
        .map(|rate| SpeedOption {
            rate,
            label: format!("{}%", (rate * 100.0).round() as u64),
            descriptor: if rate < 1.0 {
                SpeedDescriptor::Slower
            } else if rate > 1.0 {
                SpeedDescriptor::Faster
            } else {
                SpeedDescriptor::Original
            },
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/playback/control.rs"]
mod tests;
