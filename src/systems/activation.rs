//! Activation tracker sampling.
//!
//! [`activation_system`] samples every
//! [`ActivationTracker`](crate::components::activation::ActivationTracker)
//! once per frame and triggers a [`ToggleEvent`] for each tracker that flipped.
//!
//! Must run after input polling and before
//! [`recurring_schedule_system`](crate::systems::schedule::recurring_schedule_system)
//! so a toggle and its immediate fire land on the same frame.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::activation::ActivationTracker;
use crate::events::activation::ToggleEvent;
use crate::resources::input::InputState;

pub fn activation_system(
    input: Res<InputState>,
    mut trackers: Query<(Entity, &mut ActivationTracker)>,
    mut commands: Commands,
) {
    for (entity, mut tracker) in trackers.iter_mut() {
        if let Some(toggled) = tracker.sample(&input) {
            debug!("tracker {:?} toggled active={}", entity, toggled.active);
            commands.trigger(ToggleEvent {
                entity,
                active: toggled.active,
            });
        }
    }
}
