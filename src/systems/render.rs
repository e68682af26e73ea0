use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;
use raylib::prelude::*;

use crate::components::activation::ActivationTracker;
use crate::components::musicplayer::MusicPlayer;
use crate::components::nodename::Prefab;
use crate::components::position::Position;
use crate::components::shape::{Shape, Tint};
use crate::components::spawner::Spawner;
use crate::systems::spawner::world_position;

type PlacementParams<'w, 's> = (
    Query<'w, 's, &'static Position>,
    Query<'w, 's, &'static ChildOf>,
);

/// Draw every shape that is not a prefab template, plus a marker where each
/// spawner sits.
///
/// Shapes are drawn axis-aligned; the yaw only matters to what a spawn carries
/// along, not to how the placeholder meshes look.
pub fn render_pass(world: &mut World, d3: &mut RaylibMode3D<RaylibDrawHandle>) {
    d3.draw_grid(20, 1.0);

    let shapes: Vec<(Entity, Shape, Color)> = {
        let mut q = world.query_filtered::<(Entity, &Shape, Option<&Tint>), Without<Prefab>>();
        q.iter(world)
            .map(|(e, s, t)| (e, *s, t.copied().unwrap_or_default().color))
            .collect()
    };
    let spawners: Vec<(Entity, bool)> = {
        let mut q = world.query_filtered::<(Entity, &ActivationTracker), With<Spawner>>();
        q.iter(world).map(|(e, t)| (e, t.active)).collect()
    };

    let mut placement: SystemState<PlacementParams<'static, 'static>> = SystemState::new(world);
    let (positions, parents) = placement.get(world);

    for (entity, shape, color) in shapes {
        let at = world_position(entity, &positions, &parents);
        match shape {
            Shape::Cube { size } => {
                d3.draw_cube_v(at, size, color);
                d3.draw_cube_wires_v(at, size, Color::DARKGRAY);
            }
            Shape::Sphere { radius } => {
                d3.draw_sphere(at, radius, color);
            }
        }
    }

    for (entity, active) in spawners {
        let at = world_position(entity, &positions, &parents);
        let color = if active { Color::LIME } else { Color::GRAY };
        d3.draw_cube_wires_v(at, Vector3::new(0.2, 0.2, 0.2), color);
    }
}

/// On-screen status: spawner and music state, entity count, FPS.
pub fn render_hud(world: &mut World, d: &mut RaylibDrawHandle) {
    let fps = d.get_fps();
    d.draw_text(&format!("FPS: {}", fps), 10, 10, 10, Color::BLACK);

    let entity_count = world.entity_count();
    d.draw_text(&format!("Entities: {}", entity_count), 10, 25, 10, Color::BLACK);

    let mut y = 45;
    let mut spawners = world.query::<(&Spawner, &ActivationTracker)>();
    for (spawner, tracker) in spawners.iter(world) {
        let text = format!(
            "Spawner [{}]: {} ({} prefabs)",
            tracker
                .keyboard_keys()
                .map(|k| format!("{:?}", k))
                .collect::<Vec<_>>()
                .join("/"),
            if tracker.active { "on" } else { "off" },
            spawner.targets.len()
        );
        d.draw_text(&text, 10, y, 10, Color::BLACK);
        y += 15;
    }

    let mut players = world.query::<&MusicPlayer>();
    for player in players.iter(world) {
        let text = format!("Music '{}': {:?}", player.id, player.state);
        d.draw_text(&text, 10, y, 10, Color::BLACK);
        y += 15;
    }
}
