//! Power-up cards
//!
//! Cards lie on the court as pickups. The ball hands a card to whichever side
//! touched it last; that side can later play it for a timed effect.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Side;

/// Maximum cards a hand can hold
pub const MAX_HAND_SIZE: usize = 6;
/// Time scale used by a slow card with no value
pub const DEFAULT_SLOW_SCALE: f32 = 0.6;
/// Slowest allowed time scale
pub const MIN_TIME_SCALE: f32 = 0.1;

/// Card effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    /// Multiply the ball's speed
    SpeedBoost,
    /// Block the owner's goal for a while
    ShieldWall,
    /// Slow down game time
    TimeSlow,
}

/// A card definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    pub name: String,
    pub kind: CardKind,
    /// Speed multiplier or slow scale
    pub value: f32,
    /// Seconds for effects that persist
    pub duration: f32,
}

impl Default for Card {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: CardKind::SpeedBoost,
            value: 1.0,
            duration: 1.5,
        }
    }
}

impl Card {
    pub fn new(kind: CardKind, value: f32, duration: f32) -> Self {
        let name = match kind {
            CardKind::SpeedBoost => "Speed Boost",
            CardKind::ShieldWall => "Shield Wall",
            CardKind::TimeSlow => "Time Slow",
        };
        Self {
            name: name.to_string(),
            kind,
            value: value.max(0.0),
            duration: duration.max(0.0),
        }
    }
}

/// A card waiting on the court
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPickup {
    pub pos: Vec2,
    pub radius: f32,
    pub card: Card,
}

/// Cards held by one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerHand {
    pub owner: Side,
    pub max_cards: usize,
    cards: Vec<Card>,
}

impl PlayerHand {
    pub fn new(owner: Side) -> Self {
        Self {
            owner,
            max_cards: MAX_HAND_SIZE,
            cards: Vec::with_capacity(MAX_HAND_SIZE),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_full(&self) -> bool {
        self.cards.len() >= self.max_cards
    }

    /// Add a card; false when the hand is full
    pub fn try_add(&mut self, card: Card) -> bool {
        if self.is_full() {
            return false;
        }
        self.cards.push(card);
        true
    }

    /// Remove the card at `index` for playing
    pub fn take(&mut self, index: usize) -> Option<Card> {
        if index >= self.cards.len() {
            return None;
        }
        Some(self.cards.remove(index))
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

/// An active shield in front of one goal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shield {
    pub center_y: f32,
    /// Game-time seconds left
    pub remaining: f32,
}

/// Timed card effects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardEffects {
    /// Indexed by `Side::index()`
    shields: [Option<Shield>; 2],
    /// (scale, real-time seconds left)
    slow: Option<(f32, f32)>,
}

impl CardEffects {
    pub fn shield(&self, side: Side) -> Option<&Shield> {
        self.shields[side.index()].as_ref()
    }

    /// Raise (or refresh) the shield for `side`
    pub fn raise_shield(&mut self, side: Side, center_y: f32, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        self.shields[side.index()] = Some(Shield {
            center_y,
            remaining: duration,
        });
    }

    /// Slow game time; a newer slow replaces the current one
    pub fn start_slow(&mut self, value: f32, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        let scale = if value <= 0.0 {
            DEFAULT_SLOW_SCALE
        } else {
            value
        };
        self.slow = Some((scale.clamp(MIN_TIME_SCALE, 1.0), duration));
    }

    /// Multiplier applied to game time
    pub fn time_scale(&self) -> f32 {
        self.slow.map(|(scale, _)| scale).unwrap_or(1.0)
    }

    /// Count down effects. Shields run on game time, slow runs on real time.
    pub fn tick(&mut self, real_dt: f32, game_dt: f32) {
        for shield in &mut self.shields {
            if let Some(s) = shield {
                s.remaining -= game_dt;
                if s.remaining <= 0.0 {
                    *shield = None;
                }
            }
        }
        if let Some((_, remaining)) = &mut self.slow {
            *remaining -= real_dt;
            if *remaining <= 0.0 {
                self.slow = None;
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_limit() {
        let mut hand = PlayerHand::new(Side::Left);
        for _ in 0..MAX_HAND_SIZE {
            assert!(hand.try_add(Card::new(CardKind::SpeedBoost, 1.2, 0.0)));
        }
        assert!(hand.is_full());
        assert!(!hand.try_add(Card::new(CardKind::TimeSlow, 0.5, 1.0)));
        assert_eq!(hand.cards().len(), MAX_HAND_SIZE);
    }

    #[test]
    fn test_take_out_of_range() {
        let mut hand = PlayerHand::new(Side::Right);
        assert!(hand.take(0).is_none());
        hand.try_add(Card::new(CardKind::ShieldWall, 1.0, 2.0));
        hand.try_add(Card::new(CardKind::TimeSlow, 0.5, 1.0));
        assert_eq!(hand.take(1).map(|c| c.kind), Some(CardKind::TimeSlow));
        assert_eq!(hand.take(0).map(|c| c.kind), Some(CardKind::ShieldWall));
        assert!(hand.cards().is_empty());
    }

    #[test]
    fn test_shield_expires_on_game_time() {
        let mut fx = CardEffects::default();
        fx.raise_shield(Side::Left, 1.0, 1.0);
        fx.tick(5.0, 0.5);
        assert!(fx.shield(Side::Left).is_some());
        fx.tick(0.0, 0.5);
        assert!(fx.shield(Side::Left).is_none());
        assert!(fx.shield(Side::Right).is_none());
    }

    #[test]
    fn test_slow_scale_and_expiry() {
        let mut fx = CardEffects::default();
        fx.start_slow(0.0, 1.0);
        assert_eq!(fx.time_scale(), DEFAULT_SLOW_SCALE);
        fx.tick(0.5, 0.0);
        assert_eq!(fx.time_scale(), DEFAULT_SLOW_SCALE);
        fx.tick(0.5, 0.0);
        assert_eq!(fx.time_scale(), 1.0);
    }

    #[test]
    fn test_slow_clamped_and_replaced() {
        let mut fx = CardEffects::default();
        fx.start_slow(0.01, 1.0);
        assert_eq!(fx.time_scale(), MIN_TIME_SCALE);
        fx.start_slow(3.0, 2.0);
        assert_eq!(fx.time_scale(), 1.0);
        fx.start_slow(0.5, 2.0);
        fx.tick(1.0, 0.5);
        assert_eq!(fx.time_scale(), 0.5);
    }

    #[test]
    fn test_card_json_defaults() {
        let card: Card = serde_json::from_str(r#"{ "kind": "TimeSlow" }"#).expect("card");
        assert_eq!(card.kind, CardKind::TimeSlow);
        assert_eq!(card.value, 1.0);
        assert_eq!(card.duration, 1.5);
    }
}
