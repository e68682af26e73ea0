//! Dynamic body component.
//!
//! The [`PhysicsBody`] component stores velocity, gravity and a bounce factor
//! for an entity. A body only moves while `active` is true: spawned clones are
//! created with an inactive body and activated once their pose is set, so the
//! integrator never sees a half-built object.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector3;

/// Default downward acceleration in m/s².
pub const DEFAULT_GRAVITY: f32 = -9.81;

/// Simple dynamic body integrated by
/// [`physics_system`](crate::systems::physics::physics_system).
///
/// # Fields
/// - `velocity` - Current velocity in meters per second
/// - `gravity` - Vertical acceleration applied every step
/// - `restitution` - Fraction of vertical speed kept when bouncing off the floor
/// - `active` - When false the body is ignored by the physics step
#[derive(Component, Clone, Copy, Debug)]
pub struct PhysicsBody {
    pub velocity: Vector3,
    pub gravity: f32,
    pub restitution: f32,
    pub active: bool,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsBody {
    /// Active body with default gravity and no bounce.
    pub fn new() -> Self {
        Self {
            velocity: Vector3::zero(),
            gravity: DEFAULT_GRAVITY,
            restitution: 0.0,
            active: true,
        }
    }

    /// Builder setting the bounce factor, clamped to `[0, 1]`.
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Copy of this body with physics switched off and velocity cleared.
    pub fn deactivated(&self) -> Self {
        Self {
            velocity: Vector3::zero(),
            active: false,
            ..*self
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_physicsbody_new() {
        let b = PhysicsBody::new();
        assert!(b.active);
        assert!(approx_eq(b.gravity, DEFAULT_GRAVITY));
        assert!(approx_eq(b.velocity.y, 0.0));
    }

    #[test]
    fn test_deactivated_keeps_settings() {
        let mut b = PhysicsBody::new().with_restitution(0.5);
        b.velocity = Vector3::new(1.0, 2.0, 3.0);
        let d = b.deactivated();
        assert!(!d.active);
        assert!(approx_eq(d.restitution, 0.5));
        assert!(approx_eq(d.velocity.x, 0.0));
        assert!(approx_eq(d.velocity.y, 0.0));
    }

    #[test]
    fn test_restitution_clamped() {
        assert!(approx_eq(PhysicsBody::new().with_restitution(3.0).restitution, 1.0));
        assert!(approx_eq(PhysicsBody::new().with_restitution(-1.0).restitution, 0.0));
    }

    #[test]
    fn test_activate_deactivate() {
        let mut b = PhysicsBody::new();
        b.deactivate();
        assert!(!b.active);
        b.activate();
        assert!(b.active);
    }
}
