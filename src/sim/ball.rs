//! Ball simulation: serves, paddle bounces and the speed ramp

use std::rc::Rc;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{aim_velocity, hit_factor, reflect_velocity};
use super::state::{BallState, ServeDirection, Side};
use crate::audio::{AudioSink, SoundEffect, hit_intensity};
use crate::tuning::{Tuning, TuningError};

/// Uniform draw from [-amplitude, amplitude]; zero when there is no range
fn symmetric<R: Rng>(rng: &mut R, amplitude: f32) -> f32 {
    if amplitude > 0.0 {
        rng.random_range(-amplitude..=amplitude)
    } else {
        0.0
    }
}

/// Owns the ball's position and velocity
pub struct BallSimulator<R: Rng = Pcg32> {
    state: BallState,
    spawn: Vec2,
    start_speed: f32,
    speed_increase_per_hit: f32,
    max_speed: f32,
    random_bounce_y: f32,
    serve_vy_range: f32,
    min_horizontal_speed: f32,
    rng: R,
    audio: Rc<dyn AudioSink>,
}

impl<R: Rng> BallSimulator<R> {
    /// Create a ball resting at `spawn`. Fails on unusable speed settings.
    pub fn new(
        tuning: &Tuning,
        spawn: Vec2,
        rng: R,
        audio: Rc<dyn AudioSink>,
    ) -> Result<Self, TuningError> {
        tuning.validate_ball()?;
        Ok(Self {
            state: BallState::at_rest(spawn),
            spawn,
            start_speed: tuning.start_speed.max(0.0),
            speed_increase_per_hit: tuning.speed_increase_per_hit.max(0.0),
            max_speed: tuning.max_speed.max(0.0),
            random_bounce_y: tuning.random_bounce_y.max(0.0),
            serve_vy_range: tuning.serve_vy_range.max(0.0),
            min_horizontal_speed: tuning.min_horizontal_speed.max(0.0),
            rng,
            audio,
        })
    }

    pub fn state(&self) -> &BallState {
        &self.state
    }

    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    pub fn speed(&self) -> f32 {
        self.state.speed()
    }

    pub fn last_hitter(&self) -> Option<Side> {
        self.state.last_hitter
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Reset to spawn and launch toward `direction` at start speed
    pub fn serve(&mut self, direction: ServeDirection) {
        let vy = symmetric(&mut self.rng, self.serve_vy_range);
        let dir = Vec2::new(direction.sign(), vy).normalize();

        self.state = BallState {
            position: self.spawn,
            velocity: dir * self.start_speed,
            last_hitter: None,
        };
        log::debug!("Serve {:?} vel={:?}", direction, self.state.velocity);

        self.audio.play(SoundEffect::Served);
    }

    /// Serve in a coin-flip direction (match start)
    pub fn serve_random(&mut self) -> ServeDirection {
        let direction = if self.rng.random_bool(0.5) {
            ServeDirection::ToRight
        } else {
            ServeDirection::ToLeft
        };
        self.serve(direction);
        direction
    }

    /// Apply one paddle contact
    ///
    /// Call exactly once per physical contact, after the collision has already
    /// reversed the horizontal direction. Calling it twice for one contact
    /// applies the speed gain twice.
    pub fn on_paddle_contact(&mut self, paddle_center_y: f32, paddle_half_height: f32, hitter: Side) {
        self.state.last_hitter = Some(hitter);

        let factor = hit_factor(self.state.position.y, paddle_center_y, paddle_half_height);
        let aim_y = factor + symmetric(&mut self.rng, self.random_bounce_y);

        let pre_speed = self.state.speed();
        let target = (pre_speed + self.speed_increase_per_hit).clamp(0.0, self.max_speed);
        self.state.velocity = aim_velocity(
            self.state.velocity,
            aim_y,
            self.min_horizontal_speed,
            target,
        );

        let speed = self.state.speed();
        log::debug!(
            "{:?} paddle hit: factor={:.2} speed {:.2} -> {:.2}",
            hitter,
            factor,
            pre_speed,
            speed
        );
        self.audio.play(SoundEffect::Hit {
            intensity: hit_intensity(speed),
        });
    }

    /// Move along the current velocity
    pub fn advance(&mut self, dt: f32) {
        self.state.position += self.state.velocity * dt;
    }

    /// Bounce off a static surface; does not touch `last_hitter` or speed
    pub fn reflect(&mut self, normal: Vec2) {
        self.state.velocity = reflect_velocity(self.state.velocity, normal);
    }

    /// Push the ball out along an axis after a collision
    pub fn set_position(&mut self, position: Vec2) {
        self.state.position = position;
    }

    /// Multiply speed (card effect). Ignored while the ball is nearly at rest.
    pub fn boost(&mut self, multiplier: f32) {
        let v = self.state.velocity;
        if v.length_squared() < 0.01 {
            return;
        }
        let boosted = v * multiplier.max(1.0);
        self.state.velocity = boosted.clamp_length_max(self.max_speed.max(v.length()));
    }

    /// Put the ball in an exact spot with an exact velocity
    #[cfg(test)]
    pub(crate) fn place(&mut self, position: Vec2, velocity: Vec2) {
        self.state.position = position;
        self.state.velocity = velocity;
    }

    /// Stop the ball at spawn (between rallies)
    pub fn park(&mut self) {
        self.state.position = self.spawn;
        self.state.velocity = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{NullAudio, RecordingAudio};
    use rand::SeedableRng;

    fn quiet_tuning() -> Tuning {
        Tuning {
            random_bounce_y: 0.0,
            ..Default::default()
        }
    }

    fn make_ball(tuning: &Tuning, seed: u64) -> BallSimulator {
        BallSimulator::new(
            tuning,
            Vec2::ZERO,
            Pcg32::seed_from_u64(seed),
            Rc::new(NullAudio),
        )
        .expect("valid tuning")
    }

    #[test]
    fn test_serve_to_right() {
        let mut ball = make_ball(&Tuning::default(), 7);
        ball.serve(ServeDirection::ToRight);
        assert!(ball.velocity().x > 0.0);
        assert!((ball.speed() - 10.0).abs() < 1e-4);
        assert_eq!(ball.position(), Vec2::ZERO);
        assert_eq!(ball.last_hitter(), None);
    }

    #[test]
    fn test_serve_angle_bounded() {
        let mut ball = make_ball(&Tuning::default(), 99);
        for i in 0..200 {
            let dir = if i % 2 == 0 {
                ServeDirection::ToLeft
            } else {
                ServeDirection::ToRight
            };
            ball.serve(dir);
            let v = ball.velocity();
            assert_eq!(v.x.signum(), dir.sign());
            // vy/|dx| <= 0.6
            assert!((v.y / v.x).abs() <= 0.6 + 1e-5);
            assert!((ball.speed() - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_serve_resets_position_and_hitter() {
        let mut ball = make_ball(&Tuning::default(), 1);
        ball.serve(ServeDirection::ToLeft);
        ball.advance(0.5);
        ball.on_paddle_contact(ball.position().y, 1.0, Side::Left);
        assert_eq!(ball.last_hitter(), Some(Side::Left));

        ball.serve(ServeDirection::ToRight);
        assert_eq!(ball.position(), Vec2::ZERO);
        assert_eq!(ball.last_hitter(), None);
    }

    #[test]
    fn test_contact_ramps_speed() {
        let mut ball = make_ball(&quiet_tuning(), 3);
        ball.serve(ServeDirection::ToRight);
        ball.on_paddle_contact(0.0, 1.0, Side::Right);
        assert!((ball.speed() - 10.5).abs() < 1e-4);
        ball.on_paddle_contact(0.0, 1.0, Side::Left);
        assert!((ball.speed() - 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_negative_gain_never_slows() {
        let tuning = Tuning {
            speed_increase_per_hit: -2.0,
            ..quiet_tuning()
        };
        let mut ball = make_ball(&tuning, 3);
        ball.serve(ServeDirection::ToRight);
        for _ in 0..3 {
            ball.on_paddle_contact(0.0, 1.0, Side::Right);
            assert!((ball.speed() - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_speed_capped_every_contact() {
        let mut ball = make_ball(&quiet_tuning(), 3);
        ball.serve(ServeDirection::ToRight);
        for _ in 0..100 {
            ball.on_paddle_contact(0.0, 1.0, Side::Right);
            assert!(ball.speed() <= 20.0 + 1e-4);
        }
        assert!((ball.speed() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_contact_keeps_horizontal_sign() {
        let mut ball = make_ball(&Tuning::default(), 5);
        ball.serve(ServeDirection::ToLeft);
        ball.on_paddle_contact(0.0, 1.0, Side::Left);
        assert!(ball.velocity().x < 0.0);
    }

    #[test]
    fn test_contact_aims_by_offset() {
        let mut ball = make_ball(&quiet_tuning(), 5);
        ball.serve(ServeDirection::ToRight);
        ball.set_position(Vec2::new(8.0, 5.0));
        ball.on_paddle_contact(4.0, 2.0, Side::Right);
        // aim = (10-ish, 0.5) so the bounce climbs
        assert!(ball.velocity().y > 0.0);

        ball.set_position(Vec2::new(8.0, 3.0));
        ball.on_paddle_contact(4.0, 2.0, Side::Right);
        assert!(ball.velocity().y < 0.0);
    }

    #[test]
    fn test_zero_height_paddle_does_not_divide() {
        let mut ball = make_ball(&Tuning::default(), 5);
        ball.serve(ServeDirection::ToRight);
        ball.on_paddle_contact(-1.0, 0.0, Side::Right);
        assert!(ball.velocity().is_finite());
        assert!((ball.speed() - 10.5).abs() < 1e-4);
    }

    #[test]
    fn test_contact_from_rest() {
        let mut ball = make_ball(&Tuning::default(), 5);
        ball.on_paddle_contact(0.0, 1.0, Side::Left);
        assert!((ball.speed() - 0.5).abs() < 1e-5);
        assert!(ball.velocity().x > 0.0);
    }

    #[test]
    fn test_walls_keep_last_hitter() {
        let mut ball = make_ball(&Tuning::default(), 5);
        ball.serve(ServeDirection::ToRight);
        ball.on_paddle_contact(0.0, 1.0, Side::Right);
        ball.reflect(Vec2::NEG_Y);
        assert_eq!(ball.last_hitter(), Some(Side::Right));
    }

    #[test]
    fn test_audio_notifications() {
        let audio = Rc::new(RecordingAudio::default());
        let mut ball = BallSimulator::new(
            &Tuning::default(),
            Vec2::ZERO,
            Pcg32::seed_from_u64(1),
            audio.clone(),
        )
        .expect("valid tuning");
        ball.serve(ServeDirection::ToRight);
        ball.on_paddle_contact(0.0, 1.0, Side::Right);

        let played = audio.played.borrow();
        assert_eq!(played[0], SoundEffect::Served);
        match played[1] {
            SoundEffect::Hit { intensity } => {
                // 10.5 on the 2..14 scale
                assert!((intensity - (8.5 / 12.0)).abs() < 1e-4);
            }
            other => panic!("expected hit, got {:?}", other),
        }
    }

    #[test]
    fn test_same_seed_same_rally() {
        let mut a = make_ball(&Tuning::default(), 42);
        let mut b = make_ball(&Tuning::default(), 42);
        for ball in [&mut a, &mut b] {
            ball.serve(ServeDirection::ToLeft);
            ball.on_paddle_contact(0.3, 1.0, Side::Left);
            ball.on_paddle_contact(-0.2, 1.0, Side::Right);
        }
        assert_eq!(a.velocity(), b.velocity());
    }

    #[test]
    fn test_boost_capped() {
        let mut ball = make_ball(&Tuning::default(), 5);
        ball.serve(ServeDirection::ToRight);
        ball.boost(1.5);
        assert!((ball.speed() - 15.0).abs() < 1e-3);
        ball.boost(10.0);
        assert!((ball.speed() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_boost_ignored_at_rest() {
        let mut ball = make_ball(&Tuning::default(), 5);
        ball.boost(3.0);
        assert_eq!(ball.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_rejects_max_below_start() {
        let tuning = Tuning {
            max_speed: 5.0,
            ..Default::default()
        };
        let result = BallSimulator::new(
            &tuning,
            Vec2::ZERO,
            Pcg32::seed_from_u64(0),
            Rc::new(NullAudio),
        );
        assert!(result.is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: post-contact speed is pre-speed plus the gain, capped
            #[test]
            fn prop_speed_ramp_capped(
                pre_speed in 0.0f32..=20.0,
                angle in -3.1f32..3.1,
                ball_y in -6.0f32..6.0,
                seed in any::<u64>(),
            ) {
                let mut ball = make_ball(&Tuning::default(), seed);
                ball.place(Vec2::new(8.0, ball_y), Vec2::new(angle.cos(), angle.sin()) * pre_speed);
                ball.on_paddle_contact(0.0, 1.0, Side::Right);
                let expected = (pre_speed + 0.5).min(20.0);
                prop_assert!((ball.speed() - expected).abs() < 1e-3);
            }

            /// Property: horizontal component never drops under the floor
            #[test]
            fn prop_horizontal_floor(
                pre_speed in 0.6f32..=20.0,
                angle in -3.1f32..3.1,
                ball_y in -6.0f32..6.0,
                half_height in -1.0f32..3.0,
                seed in any::<u64>(),
            ) {
                let mut ball = make_ball(&Tuning::default(), seed);
                ball.place(Vec2::new(-8.0, ball_y), Vec2::new(angle.cos(), angle.sin()) * pre_speed);
                ball.on_paddle_contact(0.0, half_height, Side::Left);
                prop_assert!(ball.velocity().x.abs() >= 0.6 - 1e-4);
            }

            /// Property: hit factor stays within [-1, 1]
            #[test]
            fn prop_hit_factor_bounded(
                ball_y in -100.0f32..100.0,
                center in -10.0f32..10.0,
                half_height in -5.0f32..5.0,
            ) {
                let factor = hit_factor(ball_y, center, half_height);
                prop_assert!((-1.0..=1.0).contains(&factor));
            }
        }
    }
}
