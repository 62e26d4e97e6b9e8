//! Volley - simulation core for a two-paddle ball volley game
//!
//! Core modules:
//! - `sim`: Ball physics, match scoring, serve scheduling, cards and arena
//! - `tuning`: Data-driven game balance (validated at construction)
//! - `audio`: Fire-and-forget sound notifications
//! - `settings`: Player preferences (volume, difficulty)
//! - `persistence`: JSON save/load of scores and preferences

pub mod audio;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioManager, AudioSink, NullAudio, SoundEffect};
pub use persistence::{GameSave, PersistenceError, SaveStore};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ball defaults
    pub const START_SPEED: f32 = 10.0;
    pub const SPEED_INCREASE_PER_HIT: f32 = 0.5;
    pub const MAX_SPEED: f32 = 20.0;
    /// Jitter amplitude added to the bounce aim
    pub const RANDOM_BOUNCE_Y: f32 = 0.35;
    /// Serve vertical component is drawn from [-SERVE_VY_RANGE, SERVE_VY_RANGE]
    pub const SERVE_VY_RANGE: f32 = 0.6;
    /// Floor on the horizontal component after a paddle contact
    pub const MIN_HORIZONTAL_SPEED: f32 = 0.6;
    pub const BALL_RADIUS: f32 = 0.25;

    /// Match rules
    pub const POINTS_TO_WIN: u32 = 11;
    /// Seconds between a goal and the next serve
    pub const SERVE_DELAY: f32 = 1.0;

    /// Court dimensions (centered at the origin)
    pub const ARENA_HALF_WIDTH: f32 = 9.0;
    pub const ARENA_HALF_HEIGHT: f32 = 5.0;

    /// Paddle defaults
    pub const PADDLE_X: f32 = 8.0;
    pub const PADDLE_HALF_HEIGHT: f32 = 1.0;
    pub const PADDLE_HALF_THICKNESS: f32 = 0.15;
    /// Physics steps before the same paddle can register another contact
    pub const PADDLE_COOLDOWN_TICKS: u32 = 5;

    /// Shield wall sits this far behind its paddle
    pub const SHIELD_OFFSET: f32 = 0.6;
    pub const SHIELD_HALF_HEIGHT: f32 = 1.5;
}

/// Inverse of linear interpolation, clamped to [0, 1]
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}
