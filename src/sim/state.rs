//! Core simulation types shared by the ball, match and arena

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cards::CardKind;

/// One side of the court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Index for per-side arrays (`Left = 0`, `Right = 1`)
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Horizontal direction of a serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServeDirection {
    ToLeft,
    ToRight,
}

impl ServeDirection {
    /// Serve that travels toward `side`
    pub fn toward(side: Side) -> Self {
        match side {
            Side::Left => ServeDirection::ToLeft,
            Side::Right => ServeDirection::ToRight,
        }
    }

    /// Sign of the horizontal velocity component
    pub fn sign(self) -> f32 {
        match self {
            ServeDirection::ToLeft => -1.0,
            ServeDirection::ToRight => 1.0,
        }
    }
}

/// Ball kinematics and ownership
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Last side whose paddle touched the ball. Cleared only by a serve.
    pub last_hitter: Option<Side>,
}

impl BallState {
    pub fn at_rest(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            last_hitter: None,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    InProgress,
    /// Terminal until the match is reset
    MatchOver,
}

/// Result of recording a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalOutcome {
    /// Play goes on; a serve in `serve` direction has been scheduled
    Continuing { serve: ServeDirection },
    /// The match ended (or had already ended) with this winner
    MatchWon { winner: Side },
}

/// Things that happened during a step, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Served { direction: ServeDirection },
    PaddleHit { side: Side, speed: f32 },
    WallBounce,
    ShieldBlock { side: Side },
    Goal { conceding: Side, outcome: GoalOutcome },
    CardCollected { side: Side, kind: CardKind },
    CardPlayed { side: Side, kind: CardKind },
}
