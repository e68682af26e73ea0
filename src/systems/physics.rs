//! Minimal rigid body step.
//!
//! Integrates gravity and velocity for every active [`PhysicsBody`] and keeps
//! bodies resting on a flat floor at world height [`FLOOR_Y`]. The floor
//! clearance is the body's [`SphereCollider`] radius, falling back to half the
//! height of its [`Shape`].
//!
//! Prefab templates and inactive bodies are skipped, as are child clones: they
//! carry an inactive body and move with their parent.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use raylib::prelude::Vector3;

use crate::components::collider::SphereCollider;
use crate::components::nodename::Prefab;
use crate::components::physicsbody::PhysicsBody;
use crate::components::position::Position;
use crate::components::shape::Shape;
use crate::resources::worldtime::WorldTime;
use crate::systems::spawner::world_position;

/// World height of the floor plane.
pub const FLOOR_Y: f32 = 0.0;

/// Below this speed a bounce comes to rest.
const REST_SPEED: f32 = 0.05;

type BodyQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static mut Position,
        &'static mut PhysicsBody,
        Option<&'static SphereCollider>,
        Option<&'static Shape>,
        Option<&'static ChildOf>,
    ),
    Without<Prefab>,
>;

pub fn physics_system(
    time: Res<WorldTime>,
    parents: Query<&ChildOf>,
    mut set: ParamSet<(Query<&Position>, BodyQuery)>,
) {
    let dt = time.delta;
    if dt <= 0.0 {
        return;
    }

    // World height of each active body's parent frame
    let frames: Vec<(Entity, f32)> = {
        let bodies = set.p1();
        let candidates: Vec<(Entity, Option<Entity>)> = bodies
            .iter()
            .filter(|(_, _, body, ..)| body.active)
            .map(|(e, _, _, _, _, child_of)| (e, child_of.map(|c| c.parent())))
            .collect();
        drop(bodies);
        let positions = set.p0();
        candidates
            .into_iter()
            .map(|(e, parent)| {
                let y = parent
                    .map(|p| world_position(p, &positions, &parents).y)
                    .unwrap_or(0.0);
                (e, y)
            })
            .collect()
    };

    let mut bodies = set.p1();
    for (entity, parent_y) in frames {
        let Ok((_, mut position, mut body, collider, shape, _)) = bodies.get_mut(entity) else {
            continue;
        };
        body.velocity.y += body.gravity * dt;
        let delta = Vector3::new(
            body.velocity.x * dt,
            body.velocity.y * dt,
            body.velocity.z * dt,
        );
        position.pos = position.pos + delta;

        let clearance = collider
            .map(|c| c.radius)
            .or_else(|| shape.map(Shape::half_height))
            .unwrap_or(0.0);
        let floor_local = FLOOR_Y + clearance - parent_y;
        if position.pos.y < floor_local {
            position.pos.y = floor_local;
            if body.velocity.y < 0.0 {
                let bounced = -body.velocity.y * body.restitution;
                body.velocity.y = if bounced < REST_SPEED { 0.0 } else { bounced };
            }
        }
    }
}
