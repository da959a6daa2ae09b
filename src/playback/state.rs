use crate::{
    compose::delay::DEFAULT_DELAY_MS,
    foundation::core::{LoopMode, SourceLoopCount},
};

/// Effective per-frame delay floor, regardless of playback rate.
pub const MIN_EFFECTIVE_DELAY_MS: f64 = 5.0;
/// Effective per-frame delay floor while in reduced mode.
pub const REDUCED_MODE_MIN_DELAY_MS: f64 = 40.0;

/// Delay actually waited for a frame: `max(5, delay / rate)`, then at least 40 ms in reduced mode.
pub fn effective_delay_ms(delay_ms: u32, playback_rate: f64, reduced_mode: bool) -> f64 {
    let scaled = (f64::from(delay_ms) / playback_rate).max(MIN_EFFECTIVE_DELAY_MS);
    if reduced_mode {
        scaled.max(REDUCED_MODE_MIN_DELAY_MS)
    } else {
        scaled
    }
}

/// Observable playback state. Mutated only by the player.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlayerState {
    /// Number of composited frames (>= 1).
    pub total_frames: usize,
    /// Index of the visible frame, always `< total_frames`.
    pub current_frame: usize,
    /// Whether the clock is advancing frames.
    pub is_playing: bool,
    /// Speed multiplier, finite and > 0.
    pub playback_rate: f64,
    /// Active loop policy.
    pub loop_mode: LoopMode,
    /// Loop count declared by the source.
    pub source_loop_count: SourceLoopCount,
    /// 1-based count of passes through the sequence.
    pub effective_loop_iteration: u32,
    /// Fixed at construction from the performance policy.
    pub reduced_mode: bool,
}

impl PlayerState {
    /// Paused at frame 0, first iteration, rate 1, source loop mode.
    pub fn new(
        total_frames: usize,
        source_loop_count: SourceLoopCount,
        reduced_mode: bool,
    ) -> Self {
        Self {
            total_frames,
            current_frame: 0,
            is_playing: false,
            playback_rate: 1.0,
            loop_mode: LoopMode::Source,
            source_loop_count,
            effective_loop_iteration: 1,
            reduced_mode,
        }
    }

    /// Index of the last frame.
    pub fn last_frame(&self) -> usize {
        self.total_frames.saturating_sub(1)
    }

    /// Whether the visible frame is the last one.
    pub fn is_at_last_frame(&self) -> bool {
        self.current_frame >= self.last_frame()
    }

    /// Clamp an arbitrary (possibly negative) index into `0..total_frames`.
    pub fn clamp_frame_index(&self, index: i64) -> usize {
        let last = i64::try_from(self.last_frame()).unwrap_or(i64::MAX);
        index.clamp(0, last) as usize
    }

    /// Apply a new rate. Non-finite or non-positive rates are ignored and return `false`.
    pub fn set_playback_rate(&mut self, rate: f64) -> bool {
        if !rate.is_finite() || rate <= 0.0 {
            return false;
        }
        self.playback_rate = rate;
        true
    }

    /// Whether reaching the end always wraps around.
    pub fn loops_forever(&self) -> bool {
        self.loop_mode == LoopMode::Infinite
            || (self.loop_mode == LoopMode::Source
                && self.source_loop_count == SourceLoopCount::Infinite)
    }

    /// Effective delay of frame `index`, falling back to the default delay if it is missing.
    pub fn effective_delay_for(&self, index: usize, delays_ms: &[u32]) -> f64 {
        let delay = delays_ms.get(index).copied().unwrap_or(DEFAULT_DELAY_MS);
        effective_delay_ms(delay, self.playback_rate, self.reduced_mode)
    }

    /// Effective delay of the visible frame.
    pub fn current_effective_delay(&self, delays_ms: &[u32]) -> f64 {
        self.effective_delay_for(self.current_frame, delays_ms)
    }

    /// Move to the next frame honoring the loop policy. Returns `false` when playback must stop;
    /// the index is left unchanged in that case.
    pub fn advance_frame(&mut self) -> bool {
        if self.current_frame < self.last_frame() {
            self.current_frame += 1;
            return true;
        }

        if self.loop_mode == LoopMode::None {
            return false;
        }

        if !self.loops_forever() {
            let SourceLoopCount::Finite(count) = self.source_loop_count else {
                return false;
            };
            if self.effective_loop_iteration >= count {
                return false;
            }
        }

        self.current_frame = 0;
        self.effective_loop_iteration = self.effective_loop_iteration.saturating_add(1);
        true
    }
}

/// Result of feeding elapsed wall time into the playback clock.
#[derive(Clone, Debug, PartialEq)]
pub struct CatchUp {
    /// State after every owed frame has been advanced.
    pub state: PlayerState,
    /// Time owed toward the next frame.
    pub owed_ms: f64,
    /// Number of frame advances performed.
    pub advances: u64,
    /// Whether playback reached its end and stopped.
    pub stopped: bool,
}

/// Accumulate `elapsed_ms` into `owed_ms` and advance as many frames as it pays for.
///
/// Pure: the player applies the returned state and renders once. Large deltas (throttled hosts)
/// produce multi-frame catch-up; whole cycles of an endless loop are skipped arithmetically.
pub fn catch_up(
    mut state: PlayerState,
    delays_ms: &[u32],
    owed_ms: f64,
    elapsed_ms: f64,
) -> CatchUp {
    let mut owed = owed_ms + elapsed_ms.max(0.0);
    let mut advances = 0u64;

    if !state.is_playing {
        return CatchUp {
            state,
            owed_ms: owed,
            advances,
            stopped: false,
        };
    }

    if state.loops_forever() && owed >= MIN_EFFECTIVE_DELAY_MS * 2.0 * state.total_frames as f64 {
        let cycle: f64 = (0..state.total_frames)
            .map(|i| state.effective_delay_for(i, delays_ms))
            .sum();
        if cycle > 0.0 && owed >= 2.0 * cycle {
            let skipped = (owed / cycle).floor() - 1.0;
            owed -= skipped * cycle;
            state.effective_loop_iteration = state
                .effective_loop_iteration
                .saturating_add(skipped.min(f64::from(u32::MAX)) as u32);
            advances = (skipped * state.total_frames as f64) as u64;
        }
    }

    let mut delay = state.current_effective_delay(delays_ms);
    while owed >= delay && state.is_playing {
        owed -= delay;
        if !state.advance_frame() {
            state.is_playing = false;
            return CatchUp {
                state,
                owed_ms: 0.0,
                advances,
                stopped: true,
            };
        }
        advances += 1;
        delay = state.current_effective_delay(delays_ms);
    }

    CatchUp {
        state,
        owed_ms: owed,
        advances,
        stopped: false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/state.rs"]
mod tests;
