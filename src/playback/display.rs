use crate::{
    foundation::error::{ScrubError, ScrubResult},
    playback::engine::Player,
    playback::timer::ManualTimer,
    render::surface::RenderSurface,
};

/// A visible-frame change observed while driving a player.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameChange {
    /// Simulated timestamp of the refresh that produced the change.
    pub at_ms: f64,
    /// New visible frame.
    pub frame: usize,
    /// Loop iteration at that moment.
    pub iteration: u32,
}

/// Fixed-rate display refresh for headless hosts, delivering ticks through a [`ManualTimer`].
#[derive(Clone, Debug)]
pub struct SimulatedDisplay {
    refresh_ms: f64,
    now_ms: f64,
}

impl SimulatedDisplay {
    /// Display refreshing every `refresh_ms` milliseconds, starting at t = 0.
    pub fn new(refresh_ms: f64) -> ScrubResult<Self> {
        if !refresh_ms.is_finite() || refresh_ms <= 0.0 {
            return Err(ScrubError::validation(format!(
                "refresh interval must be finite and > 0, got {refresh_ms}"
            )));
        }
        Ok(Self {
            refresh_ms,
            now_ms: 0.0,
        })
    }

    /// Current simulated time.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Let time pass without any refresh callbacks (e.g. a backgrounded host).
    pub fn stall(&mut self, ms: f64) {
        self.now_ms += ms.max(0.0);
    }

    /// Advance one refresh and deliver the player's outstanding tick, if any.
    pub fn refresh<S: RenderSurface>(
        &mut self,
        player: &mut Player<S, ManualTimer>,
    ) -> ScrubResult<bool> {
        self.now_ms += self.refresh_ms;
        let Some(token) = player.timer_mut().take_pending() else {
            return Ok(false);
        };
        player.tick(token, self.now_ms)?;
        Ok(true)
    }

    /// Refresh until playback stops or `max_ms` of simulated time has elapsed.
    pub fn run<S: RenderSurface>(
        &mut self,
        player: &mut Player<S, ManualTimer>,
        max_ms: f64,
    ) -> ScrubResult<Vec<FrameChange>> {
        if !max_ms.is_finite() || max_ms < 0.0 {
            return Err(ScrubError::validation(format!(
                "run duration must be finite and >= 0, got {max_ms}"
            )));
        }
        let deadline = self.now_ms + max_ms;
        let mut changes = Vec::new();
        let mut last = (player.state().current_frame, player.state().effective_loop_iteration);

        while player.state().is_playing && self.now_ms < deadline {
            self.refresh(player)?;
            let now = (player.state().current_frame, player.state().effective_loop_iteration);
            if now != last {
                changes.push(FrameChange {
                    at_ms: self.now_ms,
                    frame: now.0,
                    iteration: now.1,
                });
                last = now;
            }
        }
        Ok(changes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/display.rs"]
mod tests;
