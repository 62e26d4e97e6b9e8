//! Game balance parameters
//!
//! Loaded from JSON or taken from defaults. Only two configurations are
//! refused outright; everything else is clamped into a playable range.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a tuning record cannot start a match
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("max_speed ({max_speed}) is below start_speed ({start_speed})")]
    MaxSpeedBelowStart { start_speed: f32, max_speed: f32 },

    #[error("points_to_win must be at least 1")]
    NoPointsToWin,

    #[error("{field} must be a finite value, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ball and match balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Speed immediately after a serve
    pub start_speed: f32,
    /// Speed gained per paddle contact
    pub speed_increase_per_hit: f32,
    /// Speed cap enforced on every contact
    pub max_speed: f32,
    /// Amplitude of the random vertical jitter on a paddle bounce
    pub random_bounce_y: f32,
    /// Half-width of the serve's vertical component range
    pub serve_vy_range: f32,
    /// Minimum horizontal component after a paddle bounce
    pub min_horizontal_speed: f32,
    /// Score that ends the match
    pub points_to_win: u32,
    /// Seconds between a goal and the next serve
    pub serve_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_speed: START_SPEED,
            speed_increase_per_hit: SPEED_INCREASE_PER_HIT,
            max_speed: MAX_SPEED,
            random_bounce_y: RANDOM_BOUNCE_Y,
            serve_vy_range: SERVE_VY_RANGE,
            min_horizontal_speed: MIN_HORIZONTAL_SPEED,
            points_to_win: POINTS_TO_WIN,
            serve_delay: SERVE_DELAY,
        }
    }
}

impl Tuning {
    /// Parse a tuning record and validate it
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject configurations under which no valid play can happen
    pub fn validate(&self) -> Result<(), TuningError> {
        self.validate_ball()?;
        self.validate_match()
    }

    /// Ball-side checks (used by `BallSimulator::new`)
    pub fn validate_ball(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("start_speed", self.start_speed),
            ("speed_increase_per_hit", self.speed_increase_per_hit),
            ("max_speed", self.max_speed),
            ("random_bounce_y", self.random_bounce_y),
            ("serve_vy_range", self.serve_vy_range),
            ("min_horizontal_speed", self.min_horizontal_speed),
        ] {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field, value });
            }
        }
        if self.max_speed < self.start_speed {
            return Err(TuningError::MaxSpeedBelowStart {
                start_speed: self.start_speed,
                max_speed: self.max_speed,
            });
        }
        Ok(())
    }

    /// Match-side checks (used by `MatchState::new`)
    pub fn validate_match(&self) -> Result<(), TuningError> {
        if self.points_to_win == 0 {
            return Err(TuningError::NoPointsToWin);
        }
        if !self.serve_delay.is_finite() {
            return Err(TuningError::NotFinite {
                field: "serve_delay",
                value: self.serve_delay,
            });
        }
        Ok(())
    }

    /// Serve delay with negative values treated as "serve on the next frame"
    pub fn effective_serve_delay(&self) -> f32 {
        self.serve_delay.max(0.0)
    }
}
