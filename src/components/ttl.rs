//! Time-to-live component for automatic despawning.
//!
//! Spawners configured with a lifetime attach a [`Ttl`] to every object they
//! spawn. [`ttl_system`](crate::systems::ttl::ttl_system) counts it down with
//! the scaled frame delta and despawns the entity, together with its cloned
//! children, once it reaches zero.

use bevy_ecs::prelude::Component;

/// Seconds left before the entity is despawned.
#[derive(Component, Debug, Clone, Copy)]
pub struct Ttl {
    pub remaining: f32,
}

impl Ttl {
    pub fn new(seconds: f32) -> Self {
        Ttl { remaining: seconds }
    }
}
