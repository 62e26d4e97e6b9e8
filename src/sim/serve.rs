//! Deferred serve timer
//!
//! Holds at most one pending serve. Arming replaces whatever was pending, so a
//! stale countdown can never fire after a newer goal. The scheduler never
//! blocks; the frame loop polls it with the elapsed time.

use super::state::ServeDirection;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingServe {
    remaining: f32,
    direction: ServeDirection,
}

/// Single-slot cancellable countdown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServeScheduler {
    pending: Option<PendingServe>,
}

impl ServeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a countdown of `delay` seconds, replacing any pending one
    pub fn arm(&mut self, direction: ServeDirection, delay: f32) {
        let remaining = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        if self.pending.is_some() {
            log::debug!("Serve re-armed, previous countdown dropped");
        }
        self.pending = Some(PendingServe {
            remaining,
            direction,
        });
    }

    /// Drop the pending serve, if any
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Direction of the pending serve
    pub fn pending_direction(&self) -> Option<ServeDirection> {
        self.pending.map(|p| p.direction)
    }

    /// Seconds left on the pending serve
    pub fn remaining(&self) -> Option<f32> {
        self.pending.map(|p| p.remaining)
    }

    /// Advance the countdown; yields the direction once when it runs out
    pub fn tick(&mut self, elapsed: f32) -> Option<ServeDirection> {
        let pending = self.pending.as_mut()?;
        if elapsed.is_finite() && elapsed > 0.0 {
            pending.remaining -= elapsed;
        }
        if pending.remaining <= 0.0 {
            let direction = pending.direction;
            self.pending = None;
            return Some(direction);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut sched = ServeScheduler::new();
        sched.arm(ServeDirection::ToLeft, 1.0);
        assert_eq!(sched.tick(0.5), None);
        assert_eq!(sched.tick(0.5), Some(ServeDirection::ToLeft));
        assert_eq!(sched.tick(0.5), None);
        assert!(!sched.is_pending());
    }

    #[test]
    fn test_rearm_supersedes() {
        let mut sched = ServeScheduler::new();
        sched.arm(ServeDirection::ToLeft, 0.2);
        sched.arm(ServeDirection::ToRight, 1.0);

        let mut fires = Vec::new();
        for _ in 0..100 {
            if let Some(dir) = sched.tick(0.05) {
                fires.push(dir);
            }
        }
        assert_eq!(fires, vec![ServeDirection::ToRight]);
    }

    #[test]
    fn test_rearm_mid_countdown_restarts() {
        let mut sched = ServeScheduler::new();
        sched.arm(ServeDirection::ToLeft, 1.0);
        assert_eq!(sched.tick(0.9), None);
        sched.arm(ServeDirection::ToRight, 1.0);
        assert_eq!(sched.tick(0.25), None);
        assert_eq!(sched.tick(0.75), Some(ServeDirection::ToRight));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut sched = ServeScheduler::new();
        sched.cancel();
        sched.arm(ServeDirection::ToRight, 0.1);
        sched.cancel();
        sched.cancel();
        assert_eq!(sched.tick(1.0), None);
    }

    #[test]
    fn test_zero_delay_fires_on_next_tick() {
        let mut sched = ServeScheduler::new();
        sched.arm(ServeDirection::ToRight, 0.0);
        assert_eq!(sched.tick(0.0), Some(ServeDirection::ToRight));
    }

    #[test]
    fn test_negative_elapsed_does_not_rewind() {
        let mut sched = ServeScheduler::new();
        sched.arm(ServeDirection::ToLeft, 0.5);
        sched.tick(-10.0);
        assert_eq!(sched.remaining(), Some(0.5));
    }
}
