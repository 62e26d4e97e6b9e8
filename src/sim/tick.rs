//! Game coordinator
//!
//! Wires the ball, the match and the court together. Ball movement and
//! collisions run on the fixed physics step; the serve countdown and timed
//! card effects run on frame time. The two clocks are advanced separately.

use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::{Arena, Contact};
use super::ball::BallSimulator;
use super::cards::{CardEffects, CardKind, CardPickup, PlayerHand};
use super::score::MatchState;
use super::state::{GameEvent, GoalOutcome, MatchPhase, Side};
use crate::audio::AudioSink;
use crate::consts::*;
use crate::persistence::GameSave;
use crate::settings::Settings;
use crate::tuning::{Tuning, TuningError};

/// Input commands for a single physics step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Paddle centers, indexed by `Side::index()`
    pub paddle_y: [f32; 2],
    /// Play a card from a hand: (side, hand index)
    pub play_card: Option<(Side, usize)>,
}

/// One match in progress: ball, score, court and cards
pub struct Game<R: Rng = Pcg32> {
    pub ball: BallSimulator<R>,
    pub match_state: MatchState,
    pub arena: Arena,
    hands: [PlayerHand; 2],
    effects: CardEffects,
    /// Paddle centers as of the last physics step
    paddle_y: [f32; 2],
    /// False between a goal and the next serve
    ball_in_play: bool,
    /// Unsimulated game time carried between frames
    accumulator: f32,
}

impl Game<Pcg32> {
    /// New seeded game with the ball already served
    pub fn seeded(tuning: &Tuning, seed: u64, audio: Rc<dyn AudioSink>) -> Result<Self, TuningError> {
        Self::new(tuning, Pcg32::seed_from_u64(seed), audio)
    }
}

impl<R: Rng> Game<R> {
    /// New game; the opening serve goes in a random direction
    pub fn new(tuning: &Tuning, rng: R, audio: Rc<dyn AudioSink>) -> Result<Self, TuningError> {
        let ball = BallSimulator::new(tuning, Vec2::ZERO, rng, audio.clone())?;
        let match_state = MatchState::new(tuning, audio)?;
        let mut game = Self {
            ball,
            match_state,
            arena: Arena::default(),
            hands: [PlayerHand::new(Side::Left), PlayerHand::new(Side::Right)],
            effects: CardEffects::default(),
            paddle_y: [0.0; 2],
            ball_in_play: false,
            accumulator: 0.0,
        };
        game.open_rally();
        Ok(game)
    }

    fn open_rally(&mut self) {
        let direction = self.ball.serve_random();
        self.ball_in_play = true;
        log::info!("Match start, opening serve {:?}", direction);
    }

    pub fn hand(&self, side: Side) -> &PlayerHand {
        &self.hands[side.index()]
    }

    pub fn effects(&self) -> &CardEffects {
        &self.effects
    }

    pub fn is_ball_in_play(&self) -> bool {
        self.ball_in_play
    }

    pub fn is_over(&self) -> bool {
        self.match_state.phase() == MatchPhase::MatchOver
    }

    /// Game-time multiplier from card effects
    pub fn time_scale(&self) -> f32 {
        self.effects.time_scale()
    }

    /// Drop a card onto the court
    pub fn place_pickup(&mut self, pickup: CardPickup) {
        self.arena.pickups.push(pickup);
    }

    /// Advance ball movement and collisions by one fixed step
    pub fn step_physics(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.paddle_y = input.paddle_y.map(|y| self.arena.clamp_paddle_y(y));

        if let Some((side, index)) = input.play_card {
            if let Some(kind) = self.play_card(side, index) {
                events.push(GameEvent::CardPlayed { side, kind });
            }
        }

        if !self.ball_in_play || self.is_over() {
            return events;
        }

        self.ball.advance(dt);

        for contact in self.arena.resolve(&mut self.ball, self.paddle_y, &self.effects) {
            match contact {
                Contact::Wall => events.push(GameEvent::WallBounce),
                Contact::Paddle(side) => events.push(GameEvent::PaddleHit {
                    side,
                    speed: self.ball.speed(),
                }),
                Contact::Shield(side) => events.push(GameEvent::ShieldBlock { side }),
                Contact::Goal(conceding) => {
                    self.ball_in_play = false;
                    self.ball.park();
                    let outcome = self.match_state.record_goal(conceding);
                    events.push(GameEvent::Goal { conceding, outcome });
                    return events;
                }
            }
        }

        if let Some(event) = self.collect_pickup() {
            events.push(event);
        }

        events
    }

    /// Hand a touched pickup to the last hitter, if there is one with room
    fn collect_pickup(&mut self) -> Option<GameEvent> {
        let index = self.arena.touching_pickup(self.ball.position())?;
        let side = self.ball.last_hitter()?;
        let hand = &mut self.hands[side.index()];
        if !hand.try_add(self.arena.pickups[index].card.clone()) {
            return None;
        }
        let pickup = self.arena.pickups.remove(index);
        log::debug!("{:?} collected {}", side, pickup.card.name);
        Some(GameEvent::CardCollected {
            side,
            kind: pickup.card.kind,
        })
    }

    /// Play the card at `index` from `side`'s hand and apply its effect
    pub fn play_card(&mut self, side: Side, index: usize) -> Option<CardKind> {
        let card = self.hands[side.index()].take(index)?;
        match card.kind {
            CardKind::SpeedBoost => self.ball.boost(card.value),
            CardKind::ShieldWall => {
                self.effects
                    .raise_shield(side, self.paddle_y[side.index()], card.duration)
            }
            CardKind::TimeSlow => self.effects.start_slow(card.value, card.duration),
        }
        log::debug!("{:?} played {}", side, card.name);
        Some(card.kind)
    }

    /// Advance frame-time systems: serve countdown and timed effects
    pub fn advance_clock(&mut self, real_dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let game_dt = real_dt * self.effects.time_scale();
        self.effects.tick(real_dt, game_dt);

        if let Some(direction) = self.match_state.poll_serve(game_dt) {
            self.ball.serve(direction);
            self.arena.reset_contacts();
            self.ball_in_play = true;
            events.push(GameEvent::Served { direction });
        }
        events
    }

    /// Run one rendered frame: clock first, then as many fixed steps as fit
    pub fn frame(&mut self, real_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        let real_dt = real_dt.clamp(0.0, 0.1);
        let mut events = self.advance_clock(real_dt);

        self.accumulator += real_dt * self.effects.time_scale();
        let mut input = input.clone();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(self.step_physics(&input, SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot inputs apply once per frame
            input.play_card = None;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        events
    }

    /// Start a fresh match (replay)
    pub fn replay(&mut self) {
        self.match_state.reset();
        for hand in &mut self.hands {
            hand.clear();
        }
        self.effects.clear();
        self.arena.reset_contacts();
        self.accumulator = 0.0;
        self.open_rally();
    }

    /// Save record for the current score plus preferences
    pub fn snapshot(&self, settings: &Settings) -> GameSave {
        GameSave {
            left_score: self.match_state.left_score(),
            right_score: self.match_state.right_score(),
            master_volume: settings.master_volume,
            ai_responsiveness: settings.ai_responsiveness,
            saved_at_iso: String::new(),
        }
    }

    /// Continue from saved scores
    ///
    /// Any pending serve is dropped with the old scores. A restored match that
    /// is still open and has no ball in play serves straight away.
    pub fn restore(&mut self, save: &GameSave) {
        self.match_state
            .restore_scores(save.left_score, save.right_score);
        if self.is_over() {
            self.ball_in_play = false;
            self.ball.park();
        } else if !self.ball_in_play {
            let direction = self.ball.serve_random();
            self.arena.reset_contacts();
            self.ball_in_play = true;
            log::info!(
                "Resumed at {} - {}, serve {:?}",
                save.left_score,
                save.right_score,
                direction
            );
        }
    }

    /// Outcome of the match so far
    pub fn outcome(&self) -> Option<GoalOutcome> {
        self.match_state
            .winner()
            .map(|winner| GoalOutcome::MatchWon { winner })
    }
}
