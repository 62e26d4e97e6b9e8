//! Paddle bounce math
//!
//! Pure functions: contact offset to aim, aim to post-contact velocity.
//! The paddle itself reverses the horizontal direction before these run.

use glam::Vec2;

/// Normalized vertical contact offset in [-1, 1]
///
/// +1 at the paddle's top edge, -1 at its bottom edge, saturating outside.
/// A paddle with no height saturates to the side the ball is on.
pub fn hit_factor(ball_y: f32, paddle_center_y: f32, paddle_half_height: f32) -> f32 {
    let offset = ball_y - paddle_center_y;
    if paddle_half_height <= 0.0 || !paddle_half_height.is_finite() {
        if offset > 0.0 {
            return 1.0;
        } else if offset < 0.0 {
            return -1.0;
        }
        return 0.0;
    }
    let factor = offset / paddle_half_height;
    if factor.is_nan() {
        return 0.0;
    }
    factor.clamp(-1.0, 1.0)
}

/// Post-contact velocity from pre-contact velocity and bounce aim
///
/// `aim_y` is the hit factor plus jitter. The horizontal component keeps its
/// sign (zero counts as positive) and is floored at `min_horizontal` before
/// the vector is rescaled to `target_speed`. If rescaling pulls the horizontal
/// part back under the floor, it is raised again while keeping the speed, as
/// far as the speed allows.
pub fn aim_velocity(velocity: Vec2, aim_y: f32, min_horizontal: f32, target_speed: f32) -> Vec2 {
    let min_horizontal = min_horizontal.max(0.0);
    let sign_x = if velocity.x < 0.0 { -1.0 } else { 1.0 };
    let aim_y = if aim_y.is_finite() { aim_y } else { 0.0 };

    let mut aim = Vec2::new(sign_x * velocity.x.abs().max(min_horizontal), aim_y);
    if aim.length_squared() < f32::EPSILON {
        aim = Vec2::new(sign_x, 0.0);
    }
    let mut v = aim.normalize() * target_speed;

    // Keep the horizontal floor after rescaling
    let floor = min_horizontal.min(target_speed);
    if v.x.abs() < floor {
        let vy = (target_speed * target_speed - floor * floor).max(0.0).sqrt();
        let sign_y = if v.y < 0.0 { -1.0 } else { 1.0 };
        v = Vec2::new(sign_x * floor, sign_y * vy);
    }
    v
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
