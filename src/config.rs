use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::core::LoopMode,
    foundation::error::{ScrubError, ScrubResult},
    policy::performance::PolicyThresholds,
};

/// Speed multipliers offered by the speed selector.
pub const DEFAULT_SPEED_OPTIONS: [f64; 6] = [0.25, 0.5, 1.0, 1.5, 2.0, 4.0];
/// Frames skipped by Shift+Arrow.
pub const DEFAULT_SHIFT_JUMP: u32 = 10;

/// Host-tunable player settings, loaded from JSON. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Reduced-mode thresholds.
    pub policy: PolicyThresholds,
    /// Loop policy applied before the first frame is shown.
    pub initial_loop_mode: LoopMode,
    /// Speed multiplier applied before the first frame is shown.
    pub initial_playback_rate: f64,
    /// Entries of the speed selector.
    pub speed_options: Vec<f64>,
    /// Frames skipped by Shift+Arrow.
    pub shift_jump: u32,
    /// Start playing as soon as the player is mounted.
    pub autoplay: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            policy: PolicyThresholds::default(),
            initial_loop_mode: LoopMode::Source,
            initial_playback_rate: 1.0,
            speed_options: DEFAULT_SPEED_OPTIONS.to_vec(),
            shift_jump: DEFAULT_SHIFT_JUMP,
            autoplay: true,
        }
    }
}

impl PlayerConfig {
    /// Parse and validate a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ScrubResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ScrubError::config(format!("parse player config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(s: &str) -> ScrubResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and validate a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ScrubResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ScrubError::config(format!("open player config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject values the player cannot honor.
    pub fn validate(&self) -> ScrubResult<()> {
        self.policy.validate()?;
        if !is_valid_rate(self.initial_playback_rate) {
            return Err(ScrubError::config(format!(
                "initial_playback_rate must be finite and > 0, got {}",
                self.initial_playback_rate
            )));
        }
        if let Some(bad) = self.speed_options.iter().find(|r| !is_valid_rate(**r)) {
            return Err(ScrubError::config(format!(
                "speed_options must be finite and > 0, got {bad}"
            )));
        }
        if self.shift_jump == 0 {
            return Err(ScrubError::config("shift_jump must be >= 1"));
        }
        Ok(())
    }
}

fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
