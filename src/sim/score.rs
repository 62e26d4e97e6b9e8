//! Match scoring and lifecycle
//!
//! Goals come in from the goal detector; the match decides whether play goes
//! on and, if it does, schedules the next serve.

use std::rc::Rc;

use super::serve::ServeScheduler;
use super::state::{GoalOutcome, MatchPhase, ServeDirection, Side};
use crate::audio::{AudioSink, SoundEffect};
use crate::tuning::{Tuning, TuningError};

/// Authoritative score and match phase
pub struct MatchState {
    left_score: u32,
    right_score: u32,
    phase: MatchPhase,
    winner: Option<Side>,
    points_to_win: u32,
    serve_delay: f32,
    scheduler: ServeScheduler,
    audio: Rc<dyn AudioSink>,
}

impl MatchState {
    /// New match at 0-0. Fails when `points_to_win` is zero.
    pub fn new(tuning: &Tuning, audio: Rc<dyn AudioSink>) -> Result<Self, TuningError> {
        tuning.validate_match()?;
        Ok(Self {
            left_score: 0,
            right_score: 0,
            phase: MatchPhase::InProgress,
            winner: None,
            points_to_win: tuning.points_to_win,
            serve_delay: tuning.effective_serve_delay(),
            scheduler: ServeScheduler::new(),
            audio,
        })
    }

    pub fn left_score(&self) -> u32 {
        self.left_score
    }

    pub fn right_score(&self) -> u32 {
        self.right_score
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn points_to_win(&self) -> u32 {
        self.points_to_win
    }

    /// Direction of the scheduled serve, if one is pending
    pub fn pending_serve(&self) -> Option<ServeDirection> {
        self.scheduler.pending_direction()
    }

    pub fn scheduler(&self) -> &ServeScheduler {
        &self.scheduler
    }

    /// Award a point against `conceding`
    ///
    /// The win check runs before any serve is scheduled. Once the match is
    /// over, further goals leave the score alone and report the same winner.
    pub fn record_goal(&mut self, conceding: Side) -> GoalOutcome {
        if let Some(winner) = self.winner {
            log::warn!("Goal against {:?} after match over, ignored", conceding);
            return GoalOutcome::MatchWon { winner };
        }

        self.audio.play(SoundEffect::Scored);

        let scorer = conceding.opposite();
        match scorer {
            Side::Left => self.left_score += 1,
            Side::Right => self.right_score += 1,
        }
        log::info!(
            "{:?} scores: {} - {}",
            scorer,
            self.left_score,
            self.right_score
        );

        if let Some(winner) = self.check_winner() {
            return self.finish(winner);
        }

        // Next serve travels toward the side that conceded
        let serve = ServeDirection::toward(conceding);
        self.scheduler.arm(serve, self.serve_delay);
        GoalOutcome::Continuing { serve }
    }

    /// Advance the serve countdown by frame time
    pub fn poll_serve(&mut self, elapsed: f32) -> Option<ServeDirection> {
        if self.phase == MatchPhase::MatchOver {
            return None;
        }
        self.scheduler.tick(elapsed)
    }

    /// Start over at 0-0 (replay)
    pub fn reset(&mut self) {
        self.left_score = 0;
        self.right_score = 0;
        self.phase = MatchPhase::InProgress;
        self.winner = None;
        self.scheduler.cancel();
        log::info!("Match reset");
    }

    /// Load scores from a save. A loaded score at the threshold ends the
    /// match immediately, without a game-end notification.
    pub fn restore_scores(&mut self, left: u32, right: u32) {
        self.reset();
        self.left_score = left;
        self.right_score = right;
        if let Some(winner) = self.check_winner() {
            self.phase = MatchPhase::MatchOver;
            self.winner = Some(winner);
        }
    }

    fn check_winner(&self) -> Option<Side> {
        if self.left_score >= self.points_to_win {
            Some(Side::Left)
        } else if self.right_score >= self.points_to_win {
            Some(Side::Right)
        } else {
            None
        }
    }

    fn finish(&mut self, winner: Side) -> GoalOutcome {
        self.phase = MatchPhase::MatchOver;
        self.winner = Some(winner);
        self.scheduler.cancel();
        self.audio.play(SoundEffect::GameEnded);
        log::info!(
            "Match over: {:?} wins {} - {}",
            winner,
            self.left_score,
            self.right_score
        );
        GoalOutcome::MatchWon { winner }
    }
}
