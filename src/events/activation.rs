//! Toggle events.
//!
//! [`ToggleEvent`] is triggered by
//! [`activation_system`](crate::systems::activation::activation_system) when a
//! rising edge on any activation source flips an
//! [`ActivationTracker`](crate::components::activation::ActivationTracker).

use bevy_ecs::prelude::*;

/// Event emitted when an activation tracker toggles.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleEvent {
    /// The entity owning the tracker.
    pub entity: Entity,
    /// The new `active` value.
    pub active: bool,
}
