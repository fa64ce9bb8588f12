//! Player-facing options that shape a run without being part of the
//! simulated world state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Suppresses all incoming damage; for testing and demos
    pub god_mode: bool,
    /// Master toggle for camera shake on impacts
    pub screen_shake: bool,
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            god_mode: false,
            screen_shake: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.6,
        }
    }
}

impl Settings {
    /// Shake magnitude after the user toggle is applied.
    pub fn effective_shake(&self, raw: f32) -> f32 {
        if self.screen_shake { raw } else { 0.0 }
    }

    pub fn sfx_gain(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    pub fn music_gain(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }
}
