//! Player preferences
//!
//! Volume and difficulty live outside the simulation core; only the save
//! file carries them alongside the score.

use serde::{Deserialize, Serialize};

use crate::audio::AudioManager;
use crate::lerp_clamped;
use crate::persistence::GameSave;

/// AI responsiveness at difficulty 0
pub const MIN_AI_RESPONSIVENESS: f32 = 0.4;
/// AI responsiveness at difficulty 1
pub const MAX_AI_RESPONSIVENESS: f32 = 1.2;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute everything
    pub muted: bool,

    // === Difficulty ===
    /// Scales the opponent paddle's reaction (0.4 - 1.2)
    pub ai_responsiveness: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
            ai_responsiveness: 0.9,
        }
    }
}

impl Settings {
    /// Difficulty hook: expects 0..1 from a slider
    pub fn set_difficulty(&mut self, t: f32) {
        self.ai_responsiveness = lerp_clamped(MIN_AI_RESPONSIVENESS, MAX_AI_RESPONSIVENESS, t);
    }

    /// Slider position matching the current responsiveness
    pub fn difficulty(&self) -> f32 {
        crate::inverse_lerp(
            MIN_AI_RESPONSIVENESS,
            MAX_AI_RESPONSIVENESS,
            self.ai_responsiveness,
        )
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Pick up the preference fields from a save
    pub fn apply_save(&mut self, save: &GameSave) {
        self.set_master_volume(save.master_volume);
        self.ai_responsiveness = save
            .ai_responsiveness
            .clamp(MIN_AI_RESPONSIVENESS, MAX_AI_RESPONSIVENESS);
    }

    /// Push audio preferences into the mixer
    pub fn apply_to_audio(&self, audio: &mut AudioManager) {
        audio.set_master_volume(self.master_volume);
        audio.set_sfx_volume(self.sfx_volume);
        audio.set_muted(self.muted);
    }
}
