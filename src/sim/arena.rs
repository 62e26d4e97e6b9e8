//! Rectangular court: walls, paddles, shields, goals and card pickups
//!
//! This is the collision/goal detector the core expects from its host. It
//! moves nothing on its own; it inspects the ball after each physics step and
//! resolves what it touched. Paddle contacts are de-duplicated here with a
//! per-side cooldown so the ball sees exactly one contact per hit.

use glam::Vec2;
use rand::Rng;

use super::ball::BallSimulator;
use super::cards::{CardEffects, CardPickup};
use super::state::Side;
use crate::consts::*;

/// What the ball touched during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Wall,
    Paddle(Side),
    Shield(Side),
    /// Ball crossed this side's goal line
    Goal(Side),
}

/// Court geometry and per-side contact state
#[derive(Debug, Clone)]
pub struct Arena {
    pub half_width: f32,
    pub half_height: f32,
    pub paddle_x: f32,
    pub paddle_half_height: f32,
    pub paddle_half_thickness: f32,
    pub ball_radius: f32,
    /// Card pickups lying on the court
    pub pickups: Vec<CardPickup>,
    /// Steps before each paddle can register another contact
    cooldowns: [u32; 2],
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            half_width: ARENA_HALF_WIDTH,
            half_height: ARENA_HALF_HEIGHT,
            paddle_x: PADDLE_X,
            paddle_half_height: PADDLE_HALF_HEIGHT,
            paddle_half_thickness: PADDLE_HALF_THICKNESS,
            ball_radius: BALL_RADIUS,
            pickups: Vec::new(),
            cooldowns: [0; 2],
        }
    }
}

impl Arena {
    /// Keep a paddle center inside the court
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        let limit = (self.half_height - self.paddle_half_height).max(0.0);
        if y.is_finite() { y.clamp(-limit, limit) } else { 0.0 }
    }

    /// X of the paddle's center line for `side`
    pub fn paddle_center_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => -self.paddle_x,
            Side::Right => self.paddle_x,
        }
    }

    pub fn reset_contacts(&mut self) {
        self.cooldowns = [0; 2];
    }

    /// Index of a pickup the ball overlaps, if any
    pub fn touching_pickup(&self, ball_pos: Vec2) -> Option<usize> {
        self.pickups
            .iter()
            .position(|p| (p.pos - ball_pos).length() <= p.radius + self.ball_radius)
    }

    /// Resolve the ball against the court after it moved
    ///
    /// `paddle_y` holds the paddle centers indexed by `Side::index()`.
    pub fn resolve<R: Rng>(
        &mut self,
        ball: &mut BallSimulator<R>,
        paddle_y: [f32; 2],
        effects: &CardEffects,
    ) -> Vec<Contact> {
        let mut contacts = Vec::new();

        for cooldown in &mut self.cooldowns {
            *cooldown = cooldown.saturating_sub(1);
        }

        // --- Top/bottom walls ---
        let pos = ball.position();
        let vel = ball.velocity();
        let r = self.ball_radius;
        if pos.y + r >= self.half_height && vel.y > 0.0 {
            ball.reflect(Vec2::NEG_Y);
            ball.set_position(Vec2::new(pos.x, self.half_height - r));
            contacts.push(Contact::Wall);
        } else if pos.y - r <= -self.half_height && vel.y < 0.0 {
            ball.reflect(Vec2::Y);
            ball.set_position(Vec2::new(pos.x, -self.half_height + r));
            contacts.push(Contact::Wall);
        }

        // --- Paddles ---
        for side in [Side::Left, Side::Right] {
            if self.cooldowns[side.index()] > 0 {
                continue;
            }
            let center_y = self.clamp_paddle_y(paddle_y[side.index()]);
            let face_x = self.paddle_center_x(side);
            if self.blocks(ball, side, face_x, center_y, self.paddle_half_height) {
                ball.on_paddle_contact(center_y, self.paddle_half_height, side);
                self.cooldowns[side.index()] = PADDLE_COOLDOWN_TICKS;
                contacts.push(Contact::Paddle(side));
            }
        }

        // --- Shields (behind the paddles) ---
        for side in [Side::Left, Side::Right] {
            let Some(shield) = effects.shield(side) else {
                continue;
            };
            let shield_x = match side {
                Side::Left => -self.paddle_x - SHIELD_OFFSET,
                Side::Right => self.paddle_x + SHIELD_OFFSET,
            };
            if self.blocks(ball, side, shield_x, shield.center_y, SHIELD_HALF_HEIGHT) {
                contacts.push(Contact::Shield(side));
            }
        }

        // --- Goals ---
        let x = ball.position().x;
        if x < -self.half_width {
            contacts.push(Contact::Goal(Side::Left));
        } else if x > self.half_width {
            contacts.push(Contact::Goal(Side::Right));
        }

        contacts
    }

    /// Reflect the ball off a vertical blocker guarding `side`'s goal.
    /// Returns true when the ball was touching it and moving toward the goal.
    fn blocks<R: Rng>(
        &self,
        ball: &mut BallSimulator<R>,
        side: Side,
        center_x: f32,
        center_y: f32,
        half_height: f32,
    ) -> bool {
        let pos = ball.position();
        let vel = ball.velocity();
        let r = self.ball_radius;
        let t = self.paddle_half_thickness;

        // Outward direction toward this side's goal
        let outward = match side {
            Side::Left => -1.0,
            Side::Right => 1.0,
        };
        if vel.x * outward <= 0.0 {
            return false;
        }

        let face_x = center_x - outward * t;
        // Distance the ball's leading edge has pushed past the face
        let depth = (pos.x - face_x) * outward + r;
        // Center must not be behind the blocker already
        let behind = (pos.x - (center_x + outward * t)) * outward;
        if depth < 0.0 || behind > 0.0 {
            return false;
        }
        if (pos.y - center_y).abs() > half_height + r {
            return false;
        }

        ball.reflect(Vec2::new(-outward, 0.0));
        ball.set_position(Vec2::new(face_x - outward * r, pos.y));
        true
    }
}
