//! Spawn action for [`Spawner`] entities.
//!
//! [`spawn_observer`] reacts to every [`FireEvent`] on an entity carrying a
//! `Spawner` and clones one of its resolved prefabs near the spawner.
//!
//! # Spawn order
//!
//! The clone must never be simulated in a half-built state, so the commands
//! are queued in this order and applied in the same order:
//!
//! 1. clone the template and drop its `Prefab` marker
//! 2. insert an inactive copy of the template's [`PhysicsBody`], if it has one
//! 3. parent it under the spawner's spawn parent
//! 4. set local position and yaw
//! 5. clone the template's children under the new root, keeping their poses
//! 6. optionally attach a [`Ttl`]
//! 7. activate the root body, if any
//!
//! # Placement
//!
//! The world position is the spawner's own world position plus uniform jitter
//! in `[-spread/2, spread/2]` on X and Z; Y is unchanged. The yaw is uniform in
//! `[0, 2π)`. The local position stored on the clone is the world position
//! minus the spawn parent's world position.

use std::f32::consts::TAU;

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use fastrand::Rng;
use log::{debug, warn};
use raylib::prelude::Vector3;
use rustc_hash::FxHashSet;

use crate::components::nodename::Prefab;
use crate::components::orientation::Orientation;
use crate::components::physicsbody::PhysicsBody;
use crate::components::position::Position;
use crate::components::spawner::Spawner;
use crate::components::ttl::Ttl;
use crate::events::spawn::FireEvent;
use crate::systems::prefab::{MAX_SCENE_DEPTH, pick_target};

/// Sample a random f32 in `[min, max)`.
#[inline]
fn random_f32_range(rng: &mut Rng, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range < f32::EPSILON {
        return min;
    }
    min + rng.f32() * range
}

/// Sum of translations from `entity` up its `ChildOf` chain.
///
/// Entities without a [`Position`] contribute nothing. The walk stops after
/// [`MAX_SCENE_DEPTH`] steps.
pub fn world_position(
    entity: Entity,
    positions: &Query<&Position>,
    parents: &Query<&ChildOf>,
) -> Vector3 {
    let mut total = Vector3::zero();
    let mut current = Some(entity);
    let mut depth = 0;
    while let Some(e) = current {
        if depth > MAX_SCENE_DEPTH {
            warn!("world_position: hierarchy deeper than {}", MAX_SCENE_DEPTH);
            break;
        }
        if let Ok(p) = positions.get(e) {
            total = total + p.pos;
        }
        current = parents.get(e).ok().map(|c| c.parent());
        depth += 1;
    }
    total
}

/// Clone a random resolved prefab for the spawner that fired.
///
/// Does nothing for entities without a [`Spawner`], and warns when the spawner
/// has no targets or the picked template no longer exists.
#[allow(clippy::too_many_arguments)]
pub fn spawn_observer(
    trigger: On<FireEvent>,
    spawners: Query<&Spawner>,
    positions: Query<&Position>,
    parents: Query<&ChildOf>,
    children: Query<&Children>,
    bodies: Query<&PhysicsBody>,
    mut commands: Commands,
    mut rng: Local<Rng>,
) {
    let event = trigger.event();
    let Ok(spawner) = spawners.get(event.entity) else {
        return;
    };

    let Some(template) = pick_target(&spawner.targets, &mut rng) else {
        warn!("spawner {:?}: nothing to spawn", event.entity);
        return;
    };
    if commands.get_entity(template).is_err() {
        warn!(
            "spawner {:?}: template {:?} no longer exists",
            event.entity, template
        );
        return;
    }

    let half = spawner.spread * 0.5;
    let origin = world_position(event.entity, &positions, &parents);
    let world = Vector3::new(
        origin.x + random_f32_range(&mut rng, -half, half),
        origin.y,
        origin.z + random_f32_range(&mut rng, -half, half),
    );
    let yaw = random_f32_range(&mut rng, 0.0, TAU);

    let parent_world = spawner
        .parent
        .map(|p| world_position(p, &positions, &parents))
        .unwrap_or_else(Vector3::zero);
    let local = world - parent_world;

    let body = bodies.get(template).ok().copied();

    // 1-4
    let root = {
        let mut source = commands.entity(template);
        let mut clone = source.clone_and_spawn();
        clone
            .remove::<Prefab>()
            .insert(Position { pos: local })
            .insert(Orientation::from_yaw(yaw));
        if let Some(body) = body {
            clone.insert(body.deactivated());
        }
        match spawner.parent {
            Some(parent) => {
                clone.insert(ChildOf(parent));
            }
            None => {
                clone.remove::<ChildOf>();
            }
        }
        clone.id()
    };

    // 5
    clone_children(&mut commands, template, root, &children, &bodies);

    // 6
    if let Some(seconds) = spawner.lifetime {
        commands.entity(root).insert(Ttl::new(seconds));
    }

    // 7
    if let Some(mut active) = body {
        active.velocity = Vector3::zero();
        active.activate();
        commands.entity(root).insert(active);
    }

    debug!(
        "spawner {:?}: spawned {:?} from {:?} at ({:.2}, {:.2}, {:.2}) ({:?})",
        event.entity, root, template, world.x, world.y, world.z, event.kind
    );
}

/// Clone the subtree under `template` beneath `root`.
///
/// Child clones keep their own local pose and any body they carry stays
/// inactive; they ride along with the root. Each template node is cloned at
/// most once.
fn clone_children(
    commands: &mut Commands,
    template: Entity,
    root: Entity,
    children: &Query<&Children>,
    bodies: &Query<&PhysicsBody>,
) {
    let mut visited: FxHashSet<Entity> = FxHashSet::default();
    visited.insert(template);
    let mut stack: Vec<(Entity, Entity, usize)> = vec![(template, root, 0)];

    while let Some((source, target, depth)) = stack.pop() {
        if depth >= MAX_SCENE_DEPTH {
            warn!("spawner: prefab {:?} nested too deep, truncated", template);
            continue;
        }
        let Ok(kids) = children.get(source) else {
            continue;
        };
        for child in kids.iter() {
            if !visited.insert(child) {
                continue;
            }
            let mut src = commands.entity(child);
            let mut clone = src.clone_and_spawn();
            clone.remove::<Prefab>().insert(ChildOf(target));
            if let Ok(body) = bodies.get(child) {
                clone.insert(body.deactivated());
            }
            let id = clone.id();
            stack.push((child, id, depth + 1));
        }
    }
}
