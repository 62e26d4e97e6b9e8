//! Audio notifications
//!
//! The simulation only announces what happened; turning that into sound is
//! the platform's job. Notifications are fire-and-forget: a missing or muted
//! sink never changes simulation results.

use std::cell::RefCell;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::inverse_lerp;

/// Speed at or below which a paddle hit is silent-ish (intensity 0)
pub const HIT_INTENSITY_MIN_SPEED: f32 = 2.0;
/// Speed at or above which a paddle hit is at full intensity
pub const HIT_INTENSITY_MAX_SPEED: f32 = 14.0;

/// Sound effect notifications emitted by the core
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundEffect {
    /// Ball launched from the spawn point
    Served,
    /// Ball hit a paddle; intensity in [0, 1]
    Hit { intensity: f32 },
    /// A goal was scored
    Scored,
    /// Match is over
    GameEnded,
}

/// Receiver of sound notifications
pub trait AudioSink {
    fn play(&self, effect: SoundEffect);
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&self, _effect: SoundEffect) {}
}

/// Map post-contact ball speed to hit intensity
pub fn hit_intensity(speed: f32) -> f32 {
    inverse_lerp(HIT_INTENSITY_MIN_SPEED, HIT_INTENSITY_MAX_SPEED, speed)
}

/// A sound ready for playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub effect: SoundEffect,
    /// Final volume (0.0 - 1.0), master and sfx volume applied
    pub volume: f32,
    /// Playback rate multiplier
    pub pitch: f32,
}

/// Audio manager for the game
///
/// Converts notifications into [`Cue`]s with volume and pitch variation.
/// The platform layer drains the queue once per frame.
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    hit_pitch_jitter: f32,
    rng: RefCell<Pcg32>,
    queue: RefCell<Vec<Cue>>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(0)
    }
}

impl AudioManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
            hit_pitch_jitter: 0.08,
            rng: RefCell::new(Pcg32::seed_from_u64(seed)),
            queue: RefCell::new(Vec::new()),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set pitch variation for paddle hits (0.0 - 0.2)
    pub fn set_hit_pitch_jitter(&mut self, jitter: f32) {
        self.hit_pitch_jitter = jitter.clamp(0.0, 0.2);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn jitter(&self, amplitude: f32) -> f32 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.rng.borrow_mut().random_range(-amplitude..=amplitude)
    }

    /// Take all cues queued since the last drain
    pub fn drain_cues(&self) -> Vec<Cue> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

impl AudioSink for AudioManager {
    fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let (volume, pitch) = match effect {
            SoundEffect::Served => (1.0, 1.0 + self.jitter(0.03)),
            SoundEffect::Hit { intensity } => (
                (0.25 + 0.75 * intensity).clamp(0.0, 1.0),
                1.0 + self.jitter(self.hit_pitch_jitter),
            ),
            SoundEffect::Scored => (1.0, 1.0 + self.jitter(0.02)),
            SoundEffect::GameEnded => (1.0, 1.0),
        };

        log::trace!("cue {:?} vol={:.2} pitch={:.2}", effect, volume * vol, pitch);
        self.queue.borrow_mut().push(Cue {
            effect,
            volume: volume * vol,
            pitch,
        });
    }
}

/// Sink that remembers every notification, for assertions
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingAudio {
    pub played: RefCell<Vec<SoundEffect>>,
}

#[cfg(test)]
impl RecordingAudio {
    pub fn count(&self, pred: impl Fn(&SoundEffect) -> bool) -> usize {
        self.played.borrow().iter().filter(|e| pred(e)).count()
    }
}

#[cfg(test)]
impl AudioSink for RecordingAudio {
    fn play(&self, effect: SoundEffect) {
        self.played.borrow_mut().push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_intensity_range() {
        assert_eq!(hit_intensity(0.0), 0.0);
        assert_eq!(hit_intensity(2.0), 0.0);
        assert!((hit_intensity(8.0) - 0.5).abs() < 1e-6);
        assert_eq!(hit_intensity(14.0), 1.0);
        assert_eq!(hit_intensity(20.0), 1.0);
    }

    #[test]
    fn test_hit_volume_scales_with_intensity() {
        let audio = AudioManager::new(1);
        audio.play(SoundEffect::Hit { intensity: 0.0 });
        audio.play(SoundEffect::Hit { intensity: 1.0 });
        let cues = audio.drain_cues();
        assert_eq!(cues.len(), 2);
        assert!((cues[0].volume - 0.25).abs() < 1e-6);
        assert!((cues[1].volume - 1.0).abs() < 1e-6);
        for cue in &cues {
            assert!(cue.pitch >= 0.92 && cue.pitch <= 1.08);
        }
    }

    #[test]
    fn test_master_volume_applied() {
        let mut audio = AudioManager::new(1);
        audio.set_master_volume(0.5);
        audio.play(SoundEffect::GameEnded);
        let cues = audio.drain_cues();
        assert_eq!(cues[0].volume, 0.5);
        assert_eq!(cues[0].pitch, 1.0);
    }

    #[test]
    fn test_muted_drops_cues() {
        let mut audio = AudioManager::new(1);
        audio.set_muted(true);
        audio.play(SoundEffect::Scored);
        assert!(audio.drain_cues().is_empty());
    }

    #[test]
    fn test_drain_empties_queue() {
        let audio = AudioManager::new(1);
        audio.play(SoundEffect::Served);
        assert_eq!(audio.drain_cues().len(), 1);
        assert!(audio.drain_cues().is_empty());
    }
}
