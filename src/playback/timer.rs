/// Handle for one requested display-refresh callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickToken(pub u64);

/// "Call me on the next display refresh" plus its cancellation.
///
/// The host delivers the callback by calling [`crate::Player::tick`] with the token and a
/// monotonic timestamp.
pub trait FrameTimer {
    /// Request one callback on the next refresh.
    fn request_tick(&mut self) -> TickToken;

    /// Cancel a previously requested callback. Unknown or already fired tokens are ignored.
    fn cancel_tick(&mut self, token: TickToken);
}

/// Timer for headless hosts: remembers the outstanding request and lets the host fire it.
#[derive(Clone, Debug, Default)]
pub struct ManualTimer {
    next_id: u64,
    pending: Option<TickToken>,
    requested: u64,
    cancelled: u64,
}

impl ManualTimer {
    /// Timer with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding request, if any.
    pub fn pending(&self) -> Option<TickToken> {
        self.pending
    }

    /// Consume the outstanding request so the host can deliver it.
    pub fn take_pending(&mut self) -> Option<TickToken> {
        self.pending.take()
    }

    /// Total callbacks requested.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total cancellations of an outstanding request.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameTimer for ManualTimer {
    fn request_tick(&mut self) -> TickToken {
        self.next_id += 1;
        let token = TickToken(self.next_id);
        self.pending = Some(token);
        self.requested += 1;
        token
    }

    fn cancel_tick(&mut self, token: TickToken) {
        if self.pending == Some(token) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/timer.rs"]
mod tests;
