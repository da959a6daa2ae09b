use std::sync::Arc;

use crate::{
    foundation::core::{Bitmap, LoopMode, SourceLoopCount},
    foundation::error::{ScrubError, ScrubResult},
    playback::control::{ControlState, PlayerCommand},
    playback::state::{PlayerState, catch_up},
    playback::timer::{FrameTimer, TickToken},
    render::surface::RenderSurface,
};

/// Clocked playback state machine over a composited animation.
///
/// Every state change that alters the visible frame writes that frame to the surface before
/// returning. Commands are synchronous and never dispatch further commands.
pub struct Player<S, T> {
    frames: Arc<[Bitmap]>,
    delays_ms: Arc<[u32]>,
    state: PlayerState,
    last_tick_ms: Option<f64>,
    owed_ms: f64,
    pending_tick: Option<TickToken>,
    pending_scrub: Option<usize>,
    surface: S,
    timer: T,
}

impl<S: RenderSurface, T: FrameTimer> Player<S, T> {
    /// Build a paused player at frame 0.
    ///
    /// `frames` and `delays_ms` must be non-empty, of equal length, and every bitmap must match
    /// the surface size.
    pub fn new(
        frames: Arc<[Bitmap]>,
        delays_ms: Arc<[u32]>,
        source_loop_count: SourceLoopCount,
        reduced_mode: bool,
        surface: S,
        timer: T,
    ) -> ScrubResult<Self> {
        if frames.is_empty() {
            return Err(ScrubError::EmptyAnimation);
        }
        if delays_ms.len() != frames.len() {
            return Err(ScrubError::validation(format!(
                "{} delays for {} frames",
                delays_ms.len(),
                frames.len()
            )));
        }
        let canvas = surface.canvas();
        if let Some(idx) = frames.iter().position(|f| f.canvas() != canvas) {
            return Err(ScrubError::surface(format!(
                "frame {idx} is {}x{} but the surface is {}x{}",
                frames[idx].width, frames[idx].height, canvas.width, canvas.height
            )));
        }

        let state = PlayerState::new(frames.len(), source_loop_count, reduced_mode);
        Ok(Self {
            frames,
            delays_ms,
            state,
            last_tick_ms: None,
            owed_ms: 0.0,
            pending_tick: None,
            pending_scrub: None,
            surface,
            timer,
        })
    }

    /// Show the current frame, then start playing.
    pub fn mount(&mut self) -> ScrubResult<()> {
        self.render()?;
        self.play()
    }

    /// Show the current frame without starting playback.
    pub fn show_current(&mut self) -> ScrubResult<()> {
        self.render()
    }

    /// Start playback. Restarts from frame 0 (first iteration) when parked on the last frame.
    pub fn play(&mut self) -> ScrubResult<()> {
        if self.state.total_frames <= 1 {
            return Ok(());
        }

        if self.state.is_at_last_frame() {
            self.state.current_frame = 0;
            self.state.effective_loop_iteration = 1;
            self.render()?;
        }

        self.state.is_playing = true;
        self.last_tick_ms = None;
        self.queue_tick();
        tracing::debug!(frame = self.state.current_frame, "play");
        Ok(())
    }

    /// Stop the clock, cancel the outstanding tick and forget partial progress.
    pub fn pause(&mut self) {
        let was_playing = self.state.is_playing;
        self.state.is_playing = false;
        if let Some(token) = self.pending_tick.take() {
            self.timer.cancel_tick(token);
        }
        self.last_tick_ms = None;
        self.owed_ms = 0.0;
        if was_playing {
            tracing::debug!(frame = self.state.current_frame, "pause");
        }
    }

    /// Pause when playing, play when paused.
    pub fn toggle(&mut self) -> ScrubResult<()> {
        if self.state.is_playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Pause and move `delta` frames, clamped to the sequence.
    pub fn step(&mut self, delta: i64) -> ScrubResult<()> {
        self.pause();
        let target = (self.state.current_frame as i64).saturating_add(delta);
        self.state.current_frame = self.state.clamp_frame_index(target);
        self.render()
    }

    /// Pause and jump to `frame`, clamped to the sequence.
    pub fn seek(&mut self, frame: i64) -> ScrubResult<()> {
        self.pause();
        self.state.current_frame = self.state.clamp_frame_index(frame);
        self.render()
    }

    /// Change the loop policy.
    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.state.loop_mode = mode;
    }

    /// Change the speed multiplier. Returns `false` (and changes nothing) for invalid rates.
    pub fn set_playback_rate(&mut self, rate: f64) -> bool {
        let applied = self.state.set_playback_rate(rate);
        if !applied {
            tracing::debug!(rate, "ignoring invalid playback rate");
        }
        applied
    }

    /// Scrubber drag. In reduced mode the target is only recorded until [`Self::scrub_commit`].
    pub fn scrub_preview(&mut self, frame: i64) -> ScrubResult<()> {
        if self.state.reduced_mode {
            self.pending_scrub = Some(self.state.clamp_frame_index(frame));
            return Ok(());
        }
        self.seek(frame)
    }

    /// Scrubber released. Seeks only if a deferred preview is outstanding.
    pub fn scrub_commit(&mut self, frame: i64) -> ScrubResult<()> {
        if self.pending_scrub.take().is_none() {
            return Ok(());
        }
        self.seek(frame)
    }

    /// Apply one UI command.
    pub fn dispatch(&mut self, cmd: PlayerCommand) -> ScrubResult<()> {
        match cmd {
            PlayerCommand::Play => self.play(),
            PlayerCommand::Pause => {
                self.pause();
                Ok(())
            }
            PlayerCommand::Toggle => self.toggle(),
            PlayerCommand::Step(delta) => self.step(delta),
            PlayerCommand::Seek(frame) => self.seek(frame),
            PlayerCommand::SetLoopMode(mode) => {
                self.set_loop_mode(mode);
                Ok(())
            }
            PlayerCommand::SetPlaybackRate(rate) => {
                self.set_playback_rate(rate);
                Ok(())
            }
            PlayerCommand::ScrubPreview(frame) => self.scrub_preview(frame),
            PlayerCommand::ScrubCommit(frame) => self.scrub_commit(frame),
        }
    }

    /// Display-refresh callback for `token` with a monotonic timestamp in milliseconds.
    ///
    /// Tokens other than the outstanding request (cancelled or superseded) are ignored. The first
    /// tick after (re)starting only records the baseline. Later ticks pay owed time into frame
    /// advances, render the resulting frame once, and reschedule while playing.
    pub fn tick(&mut self, token: TickToken, timestamp_ms: f64) -> ScrubResult<()> {
        if self.pending_tick != Some(token) {
            tracing::trace!(?token, "ignoring stale tick");
            return Ok(());
        }
        self.pending_tick = None;
        if !self.state.is_playing {
            return Ok(());
        }

        let Some(last) = self.last_tick_ms.replace(timestamp_ms) else {
            self.queue_tick();
            return Ok(());
        };

        let before = self.state.current_frame;
        let outcome = catch_up(
            self.state.clone(),
            &self.delays_ms,
            self.owed_ms,
            timestamp_ms - last,
        );
        self.state = outcome.state;
        self.owed_ms = outcome.owed_ms;

        if outcome.advances > 0 || self.state.current_frame != before {
            self.render()?;
        }

        if outcome.stopped {
            tracing::debug!(
                frame = self.state.current_frame,
                iteration = self.state.effective_loop_iteration,
                "playback reached end"
            );
            self.pause();
        } else {
            self.queue_tick();
        }
        Ok(())
    }

    /// Current state.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Snapshot for the UI layer.
    pub fn control_state(&self) -> ControlState {
        ControlState::from_state(&self.state, self.pending_scrub)
    }

    /// Composited frames.
    pub fn frames(&self) -> &[Bitmap] {
        &self.frames
    }

    /// Normalized delays.
    pub fn delays_ms(&self) -> &[u32] {
        &self.delays_ms
    }

    /// Time owed toward the next frame advance.
    pub fn owed_ms(&self) -> f64 {
        self.owed_ms
    }

    /// Whether a tick has been requested and not yet delivered or cancelled.
    pub fn has_pending_tick(&self) -> bool {
        self.pending_tick.is_some()
    }

    /// Output surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Timer.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Timer, for hosts that deliver callbacks themselves.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    fn queue_tick(&mut self) {
        if !self.state.is_playing || self.pending_tick.is_some() {
            return;
        }
        self.pending_tick = Some(self.timer.request_tick());
    }

    fn render(&mut self) -> ScrubResult<()> {
        let frame = &self.frames[self.state.current_frame];
        self.surface.write_bitmap(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/engine.rs"]
mod tests;
