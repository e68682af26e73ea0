//! Lifetime countdown.
//!
//! [`ttl_system`] subtracts the scaled frame delta from every
//! [`Ttl`](crate::components::ttl::Ttl) and despawns entities whose time ran
//! out. Despawning a parent also despawns its children, so a spawned object
//! goes away as a whole.

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::ttl::Ttl;
use crate::resources::worldtime::WorldTime;

pub fn ttl_system(
    world_time: Res<WorldTime>,
    mut query: Query<(Entity, &mut Ttl)>,
    mut commands: Commands,
) {
    let dt = world_time.delta; // already scaled
    for (entity, mut ttl) in query.iter_mut() {
        ttl.remaining -= dt;
        if ttl.remaining <= 0.0 {
            trace!("ttl expired for {:?}", entity);
            commands.entity(entity).try_despawn();
        }
    }
}
