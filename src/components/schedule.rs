//! Immediate + rate-limited recurring firing driven by an activation flag.
//!
//! The [`RecurringSchedule`] component turns the `active` flag of an
//! [`ActivationTracker`](crate::components::activation::ActivationTracker)
//! into fire decisions:
//!
//! 1. On the frame `active` goes false → true, fire once immediately.
//! 2. While `active` stays true, accumulate delta time and fire again once the
//!    accumulator reaches `max(nominal_interval, min_interval)` **and** at least
//!    `min_interval` seconds have passed since the last fire.
//! 3. While inactive, never fire; the accumulator stays at zero.
//!
//! `min_interval` is a hard floor: a tiny configured interval cannot make the
//! action fire every frame.
//!
//! # Related
//!
//! - [`crate::systems::schedule::recurring_schedule_system`] – ticks schedules each frame
//! - [`crate::events::spawn::FireEvent`] – emitted for every fire

use bevy_ecs::prelude::Component;

/// Minimum seconds between two spawn actions, whatever the configuration says.
pub const MIN_SPAWN_INTERVAL: f32 = 1.0;

/// What the schedule decided for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireDecision {
    /// Fired because the tracker just became active.
    pub immediate: bool,
    /// Fired because a full interval elapsed while active.
    pub recurring: bool,
}

impl FireDecision {
    pub fn fired(&self) -> bool {
        self.immediate || self.recurring
    }
}

#[derive(Component, Debug, Clone)]
pub struct RecurringSchedule {
    /// Configured recurrence period in seconds.
    pub nominal_interval: f32,
    /// Floor on the period and on the gap between two fires.
    pub min_interval: f32,
    /// Time accumulated since the last fire while active.
    pub accumulated: f32,
    /// `WorldTime::elapsed` of the last fire.
    pub last_fire: Option<f32>,
    /// Active flag seen on the previous tick, for edge detection.
    pub was_active: bool,
}

impl RecurringSchedule {
    /// Create a schedule. Negative or NaN intervals are treated as zero.
    pub fn new(nominal_interval: f32, min_interval: f32) -> Self {
        Self {
            nominal_interval: non_negative(nominal_interval),
            min_interval: non_negative(min_interval),
            accumulated: 0.0,
            last_fire: None,
            was_active: false,
        }
    }

    /// Schedule using the spawn floor of [`MIN_SPAWN_INTERVAL`].
    pub fn spawn(nominal_interval: f32) -> Self {
        Self::new(nominal_interval, MIN_SPAWN_INTERVAL)
    }

    /// Effective period between recurring fires.
    pub fn period(&self) -> f32 {
        self.nominal_interval.max(self.min_interval)
    }

    /// Advance the schedule by `dt` seconds at world time `now`.
    pub fn tick(&mut self, dt: f32, now: f32, active: bool) -> FireDecision {
        if !active {
            self.accumulated = 0.0;
            self.was_active = false;
            return FireDecision::default();
        }

        if !self.was_active {
            self.was_active = true;
            self.accumulated = 0.0;
            self.last_fire = Some(now);
            return FireDecision {
                immediate: true,
                recurring: false,
            };
        }

        self.accumulated += non_negative(dt);

        let gap_ok = self
            .last_fire
            .map(|t| now - t >= self.min_interval)
            .unwrap_or(true);
        if self.accumulated >= self.period() && gap_ok {
            self.accumulated = 0.0;
            self.last_fire = Some(now);
            return FireDecision {
                immediate: false,
                recurring: true,
            };
        }

        FireDecision::default()
    }

    /// Forget any partial interval and the last fire time.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.last_fire = None;
        self.was_active = false;
    }
}

#[inline]
fn non_negative(v: f32) -> f32 {
    if v > 0.0 { v } else { 0.0 }
}
