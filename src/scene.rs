//! Demo scene construction.
//!
//! [`build_scene`] populates the world with:
//!
//! - a [`SceneRoot`] holding the named prefab templates (`apple_01`,
//!   `banana_02` with a stem child, `crate_03`), all marked [`Prefab`];
//! - a spawn parent (`spawned_objects`) that new objects are attached to;
//! - the spawner, floating above the floor, toggled by its configured key and
//!   controller button;
//! - the music player, toggled the same way with its own binding.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use log::info;
use raylib::prelude::Vector3;

use crate::components::activation::{ActivationSource, ActivationTracker};
use crate::components::collider::SphereCollider;
use crate::components::musicplayer::MusicPlayer;
use crate::components::nodename::{NodeName, Prefab, SceneRoot};
use crate::components::orientation::Orientation;
use crate::components::physicsbody::PhysicsBody;
use crate::components::position::Position;
use crate::components::schedule::RecurringSchedule;
use crate::components::shape::{Shape, Tint};
use crate::components::spawner::Spawner;
use crate::resources::sceneconfig::{InputBinding, SceneConfig};

/// Stream id of the background music.
pub const MUSIC_ID: &str = "background";

/// Entities created by [`build_scene`].
#[derive(Debug, Clone, Copy)]
pub struct SceneHandles {
    pub root: Entity,
    pub spawn_parent: Entity,
    pub spawner: Entity,
    pub music: Entity,
}

/// Tracker watching the binding's key and controller button.
pub fn tracker_for(binding: &InputBinding) -> ActivationTracker {
    ActivationTracker::new()
        .with_source(ActivationSource::keyboard(binding.key))
        .with_source(ActivationSource::controller(
            binding.handedness,
            binding.button,
        ))
}

/// Spawn the prefab library under `root`.
fn spawn_prefabs(world: &mut World, root: Entity) {
    world.spawn((
        NodeName::new("apple_01"),
        Prefab,
        ChildOf(root),
        Position::new(-4.0, 0.0, -4.0),
        Orientation::identity(),
        Shape::Sphere { radius: 0.08 },
        SphereCollider::new(0.08),
        Tint::new(200, 30, 40, 255),
        PhysicsBody::new().with_restitution(0.4),
    ));

    let banana = world
        .spawn((
            NodeName::new("banana_02"),
            Prefab,
            ChildOf(root),
            Position::new(-4.0, 0.0, -3.0),
            Orientation::identity(),
            Shape::Cube {
                size: Vector3::new(0.2, 0.05, 0.05),
            },
            Tint::new(240, 220, 60, 255),
            PhysicsBody::new().with_restitution(0.1),
        ))
        .id();
    world.spawn((
        NodeName::new("banana_stem"),
        Prefab,
        ChildOf(banana),
        Position::new(0.1, 0.03, 0.0),
        Orientation::identity(),
        Shape::Cube {
            size: Vector3::new(0.02, 0.02, 0.02),
        },
        Tint::new(90, 60, 20, 255),
    ));

    world.spawn((
        NodeName::new("crate_03"),
        Prefab,
        ChildOf(root),
        Position::new(-4.0, 0.0, -2.0),
        Orientation::identity(),
        Shape::Cube {
            size: Vector3::new(0.25, 0.25, 0.25),
        },
        Tint::new(150, 100, 50, 255),
        PhysicsBody::new(),
    ));
}

/// Build the demo scene described by `config`.
pub fn build_scene(world: &mut World, config: &SceneConfig) -> SceneHandles {
    let root = world
        .spawn((SceneRoot, NodeName::new("scene"), Position::default()))
        .id();
    spawn_prefabs(world, root);

    let spawn_parent = world
        .spawn((
            NodeName::new("spawned_objects"),
            ChildOf(root),
            Position::default(),
        ))
        .id();

    let spawner = world
        .spawn((
            NodeName::new("spawner"),
            ChildOf(root),
            Position::new(0.0, 1.5, 0.0),
            tracker_for(&config.spawn_binding),
            RecurringSchedule::spawn(config.spawn_interval),
            {
                let mut s = Spawner::new(config.spawn_targets.iter().cloned())
                    .with_spread(config.spawn_spread)
                    .with_parent(spawn_parent)
                    .with_lifetime(config.spawn_lifetime);
                s.offset = config.spawn_offset;
                s.random_area = config.spawn_random_area;
                s
            },
        ))
        .id();

    let music = world
        .spawn((
            NodeName::new("music"),
            tracker_for(&config.music_binding),
            MusicPlayer::new(MUSIC_ID, config.music_path.clone())
                .with_volume(config.music_volume)
                .with_looped(config.music_loop),
        ))
        .id();

    info!(
        "scene built: spawner {:?} targets {:?}, music '{}'",
        spawner, config.spawn_targets, config.music_path
    );

    SceneHandles {
        root,
        spawn_parent,
        spawner,
        music,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::activation::{ControllerButton, Handedness};
    use raylib::prelude::KeyboardKey;

    #[test]
    fn test_build_scene_spawns_expected_entities() {
        let mut world = World::new();
        let handles = build_scene(&mut world, &SceneConfig::new());

        assert!(world.get::<SceneRoot>(handles.root).is_some());
        let spawner = world.get::<Spawner>(handles.spawner).unwrap();
        assert_eq!(spawner.parent, Some(handles.spawn_parent));
        assert!(!spawner.resolved);
        assert!(world.get::<MusicPlayer>(handles.music).is_some());

        let mut prefabs = world.query_filtered::<&NodeName, With<Prefab>>();
        let mut names: Vec<String> = prefabs.iter(&world).map(|n| n.0.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["apple_01", "banana_02", "banana_stem", "crate_03"]);
    }

    #[test]
    fn test_tracker_for_binding() {
        let binding = InputBinding {
            button: ControllerButton::Squeeze,
            handedness: Handedness::Left,
            key: KeyboardKey::KEY_M,
        };
        let tracker = tracker_for(&binding);
        assert_eq!(tracker.sources.len(), 2);
        assert_eq!(
            tracker.keyboard_keys().collect::<Vec<_>>(),
            vec![KeyboardKey::KEY_M]
        );
        assert!(!tracker.active);
    }
}
