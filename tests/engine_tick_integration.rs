//! Engine tick integration tests for activation, scheduling, spawning, music
//! and physics.
//!
//! Worlds are driven without a window or audio device: `InputState` is written
//! directly and `Messages<AudioCmd>` is drained to observe audio requests.

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use raylib::prelude::{KeyboardKey, Vector3};

use xrspawner::components::activation::{
    ActivationSource, ActivationTracker, ControllerButton, Handedness,
};
use xrspawner::components::collider::SphereCollider;
use xrspawner::components::musicplayer::{MusicPlayer, PlaybackState};
use xrspawner::components::nodename::{NodeName, Prefab, SceneRoot};
use xrspawner::components::physicsbody::PhysicsBody;
use xrspawner::components::position::Position;
use xrspawner::components::schedule::RecurringSchedule;
use xrspawner::components::shape::Shape;
use xrspawner::components::spawner::Spawner;
use xrspawner::components::ttl::Ttl;
use xrspawner::events::activation::ToggleEvent;
use xrspawner::events::audio::{AudioCmd, AudioMessage};
use xrspawner::events::spawn::{FireEvent, FireKind};
use xrspawner::resources::input::{ControllerState, InputState};
use xrspawner::resources::worldtime::WorldTime;
use xrspawner::systems::activation::activation_system;
use xrspawner::systems::music::{
    music_load_system, music_state_system, music_teardown_system, music_toggle_observer,
};
use xrspawner::systems::physics::physics_system;
use xrspawner::systems::prefab::resolve_spawner_targets;
use xrspawner::systems::schedule::recurring_schedule_system;
use xrspawner::systems::spawner::spawn_observer;
use xrspawner::systems::time::update_world_time;
use xrspawner::systems::ttl::ttl_system;

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Resource, Default)]
struct Toggles(Vec<bool>);

#[derive(Resource, Default)]
struct Fires(Vec<(FireKind, f32)>);

fn record_toggle(trigger: On<ToggleEvent>, mut toggles: ResMut<Toggles>) {
    toggles.0.push(trigger.event().active);
}

fn record_fire(trigger: On<FireEvent>, time: Res<WorldTime>, mut fires: ResMut<Fires>) {
    fires.0.push((trigger.event().kind, time.elapsed));
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.init_resource::<Messages<AudioCmd>>();
    world.init_resource::<Messages<AudioMessage>>();
    world.init_resource::<Toggles>();
    world.init_resource::<Fires>();
    world.spawn(Observer::new(record_toggle));
    world.spawn(Observer::new(record_fire));
    world.spawn(Observer::new(spawn_observer));
    world.spawn(Observer::new(music_toggle_observer));
    world.flush();
    world
}

fn make_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            resolve_spawner_targets,
            activation_system,
            recurring_schedule_system,
            physics_system,
            ttl_system,
            music_load_system,
            music_teardown_system,
            music_state_system,
        )
            .chain(),
    );
    schedule
}

fn tick(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
}

fn space_tracker() -> ActivationTracker {
    ActivationTracker::new()
        .with_source(ActivationSource::keyboard(KeyboardKey::KEY_SPACE))
        .with_source(ActivationSource::controller(
            Handedness::Right,
            ControllerButton::Trigger,
        ))
}

fn set_space(world: &mut World, down: bool) {
    world
        .resource_mut::<InputState>()
        .set_key(KeyboardKey::KEY_SPACE, down);
}

fn set_right_trigger(world: &mut World, down: bool) {
    let mut state = ControllerState::default();
    state.set(ControllerButton::Trigger, down);
    world
        .resource_mut::<InputState>()
        .set_controller(Handedness::Right, Some(state));
}

fn drain_audio_cmds(world: &mut World) -> Vec<AudioCmd> {
    world.resource_mut::<Messages<AudioCmd>>().drain().collect()
}

/// Scene root with `apple_01` and `banana_02` (plus a stem child) as prefabs,
/// and a spawn parent at the origin. Returns `(root, spawn_parent)`.
fn spawn_prefab_scene(world: &mut World) -> (Entity, Entity) {
    let root = world
        .spawn((SceneRoot, NodeName::new("scene"), Position::default()))
        .id();
    world.spawn((
        NodeName::new("apple_01"),
        Prefab,
        ChildOf(root),
        Position::new(-4.0, 0.0, -4.0),
        Shape::Sphere { radius: 0.1 },
        SphereCollider::new(0.1),
        PhysicsBody::new(),
    ));
    let banana = world
        .spawn((
            NodeName::new("banana_02"),
            Prefab,
            ChildOf(root),
            Position::new(-4.0, 0.0, -3.0),
            Shape::Cube {
                size: Vector3::new(0.2, 0.05, 0.05),
            },
            PhysicsBody::new(),
        ))
        .id();
    world.spawn((
        NodeName::new("banana_stem"),
        Prefab,
        ChildOf(banana),
        Position::new(0.1, 0.03, 0.0),
    ));
    let spawn_parent = world
        .spawn((NodeName::new("spawned"), ChildOf(root), Position::default()))
        .id();
    (root, spawn_parent)
}

fn spawn_spawner(world: &mut World, targets: &[&str], spawn_parent: Entity) -> Entity {
    world
        .spawn((
            Position::new(0.0, 1.5, 0.0),
            space_tracker(),
            RecurringSchedule::spawn(2.0),
            Spawner::new(targets.iter().copied()).with_parent(spawn_parent),
        ))
        .id()
}

/// Live (non-template) entities named `name`.
fn clones_named(world: &mut World, name: &str) -> Vec<Entity> {
    let mut q = world.query_filtered::<(Entity, &NodeName), Without<Prefab>>();
    q.iter(world)
        .filter(|(_, n)| n.as_str() == name)
        .map(|(e, _)| e)
        .collect()
}

// =============================================================================
// Activation
// =============================================================================

#[test]
fn activation_toggles_on_rising_edge_only() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let tracker = world.spawn(space_tracker()).id();

    set_space(&mut world, true);
    for _ in 0..5 {
        tick(&mut world, &mut schedule, 0.1);
    }
    assert_eq!(world.resource::<Toggles>().0, vec![true]);
    assert!(world.get::<ActivationTracker>(tracker).unwrap().active);

    set_space(&mut world, false);
    tick(&mut world, &mut schedule, 0.1);
    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);
    assert_eq!(world.resource::<Toggles>().0, vec![true, false]);
    assert!(!world.get::<ActivationTracker>(tracker).unwrap().active);
}

#[test]
fn activation_simultaneous_sources_toggle_once() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let tracker = world.spawn(space_tracker()).id();

    set_space(&mut world, true);
    set_right_trigger(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);

    assert_eq!(world.resource::<Toggles>().0, vec![true]);
    assert!(world.get::<ActivationTracker>(tracker).unwrap().active);
}

#[test]
fn activation_either_source_toggles_shared_state() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let tracker = world.spawn(space_tracker()).id();

    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);
    set_right_trigger(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);

    assert_eq!(world.resource::<Toggles>().0, vec![true, false]);
    assert!(!world.get::<ActivationTracker>(tracker).unwrap().active);
}

#[test]
fn activation_missing_controller_reads_unpressed() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    world.spawn(space_tracker());

    world
        .resource_mut::<InputState>()
        .set_controller(Handedness::Right, None);
    for _ in 0..3 {
        tick(&mut world, &mut schedule, 0.1);
    }
    assert!(world.resource::<Toggles>().0.is_empty());
}

// =============================================================================
// Scheduling
// =============================================================================

#[test]
fn schedule_fires_immediately_then_every_interval() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    world.spawn((space_tracker(), RecurringSchedule::spawn(2.0)));

    set_space(&mut world, true);
    // 5 seconds at 0.25 s per frame
    for _ in 0..20 {
        tick(&mut world, &mut schedule, 0.25);
    }

    let fires = &world.resource::<Fires>().0;
    assert_eq!(fires.len(), 3);
    assert_eq!(fires[0].0, FireKind::Immediate);
    assert!(approx_eq(fires[0].1, 0.25));
    assert_eq!(fires[1].0, FireKind::Recurring);
    assert!(approx_eq(fires[1].1, 2.25));
    assert!(approx_eq(fires[2].1, 4.25));
}

#[test]
fn schedule_interval_floor_holds_for_tiny_interval() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    world.spawn((space_tracker(), RecurringSchedule::spawn(0.1)));

    set_space(&mut world, true);
    for _ in 0..40 {
        tick(&mut world, &mut schedule, 0.25);
    }

    let fires = &world.resource::<Fires>().0;
    // Active from t=0.25 to t=10.0: fires at 0.25, 1.25, ..., 9.25
    assert_eq!(fires.len(), 10);
    for pair in fires.windows(2) {
        assert!(pair[1].1 - pair[0].1 >= 1.0 - EPSILON);
    }
}

#[test]
fn schedule_stops_on_deactivation_and_restarts_immediately() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let entity = world
        .spawn((space_tracker(), RecurringSchedule::spawn(2.0)))
        .id();

    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.5);
    set_space(&mut world, false);
    tick(&mut world, &mut schedule, 0.5);
    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.5); // deactivates
    set_space(&mut world, false);
    for _ in 0..10 {
        tick(&mut world, &mut schedule, 0.5);
    }
    assert_eq!(world.resource::<Fires>().0.len(), 1);
    assert!(approx_eq(
        world.get::<RecurringSchedule>(entity).unwrap().accumulated,
        0.0
    ));

    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.5);
    let fires = &world.resource::<Fires>().0;
    assert_eq!(fires.len(), 2);
    assert_eq!(fires[1].0, FireKind::Immediate);
}

// =============================================================================
// Spawning
// =============================================================================

#[test]
fn spawn_clones_prefab_under_spawn_parent() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let (_, spawn_parent) = spawn_prefab_scene(&mut world);
    let spawner = spawn_spawner(&mut world, &["apple"], spawn_parent);

    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);

    let s = world.get::<Spawner>(spawner).unwrap();
    assert!(s.resolved);
    assert_eq!(s.targets.len(), 1);

    let clones = clones_named(&mut world, "apple_01");
    assert_eq!(clones.len(), 1);
    let clone = clones[0];

    assert!(world.get::<Prefab>(clone).is_none());
    assert_eq!(world.get::<ChildOf>(clone).unwrap().parent(), spawn_parent);
    assert!(world.get::<PhysicsBody>(clone).unwrap().active);

    let pos = world.get::<Position>(clone).unwrap().pos;
    assert!(pos.x.abs() <= 0.25 + EPSILON);
    assert!(pos.z.abs() <= 0.25 + EPSILON);
    // Gravity already pulled it below the spawner
    assert!(pos.y < 1.5);
    assert!(pos.y > 0.0);

    // The template is untouched
    let mut templates = world.query_filtered::<(&NodeName, &Position), With<Prefab>>();
    let (_, template_pos) = templates
        .iter(&world)
        .find(|(n, _)| n.as_str() == "apple_01")
        .unwrap();
    assert!(approx_eq(template_pos.pos.x, -4.0));
    assert!(approx_eq(template_pos.pos.y, 0.0));
}

#[test]
fn spawn_without_template_body_adds_no_body() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let (root, spawn_parent) = spawn_prefab_scene(&mut world);
    world.spawn((
        NodeName::new("pear_04"),
        Prefab,
        ChildOf(root),
        Position::new(-4.0, 0.0, -1.0),
        Shape::Sphere { radius: 0.1 },
    ));
    spawn_spawner(&mut world, &["pear"], spawn_parent);

    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);

    let clones = clones_named(&mut world, "pear_04");
    assert_eq!(clones.len(), 1);
    assert!(world.get::<PhysicsBody>(clones[0]).is_none());
    assert!(world.get::<Shape>(clones[0]).is_some());
}

#[test]
fn spawn_with_no_resolved_targets_is_inert() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let (_, spawn_parent) = spawn_prefab_scene(&mut world);
    let spawner = spawn_spawner(&mut world, &["kiwi"], spawn_parent);

    let before = world.entity_count();
    set_space(&mut world, true);
    for _ in 0..20 {
        tick(&mut world, &mut schedule, 0.25);
    }

    let s = world.get::<Spawner>(spawner).unwrap();
    assert!(s.resolved);
    assert!(s.targets.is_empty());
    // Fires still happen, they just spawn nothing
    assert!(!world.resource::<Fires>().0.is_empty());
    assert_eq!(world.entity_count(), before);
}

#[test]
fn spawn_deleted_template_is_skipped() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let (_, spawn_parent) = spawn_prefab_scene(&mut world);
    spawn_spawner(&mut world, &["apple"], spawn_parent);

    tick(&mut world, &mut schedule, 0.1); // resolve
    assert!(clones_named(&mut world, "apple_01").is_empty());
    let mut q = world.query_filtered::<(Entity, &NodeName), With<Prefab>>();
    let apple = q
        .iter(&world)
        .find(|(_, n)| n.as_str() == "apple_01")
        .map(|(e, _)| e)
        .unwrap();
    world.despawn(apple);

    let before = world.entity_count();
    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);
    assert_eq!(world.entity_count(), before);
}

#[test]
fn spawn_copies_children_of_prefab() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let (_, spawn_parent) = spawn_prefab_scene(&mut world);
    spawn_spawner(&mut world, &["banana"], spawn_parent);

    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);

    let clones = clones_named(&mut world, "banana_02");
    assert_eq!(clones.len(), 1);
    let clone = clones[0];

    let kids: Vec<Entity> = world
        .get::<Children>(clone)
        .map(|c| c.iter().collect())
        .unwrap_or_default();
    assert_eq!(kids.len(), 1);
    let stem = kids[0];
    assert_eq!(world.get::<NodeName>(stem).unwrap().as_str(), "banana_stem");
    assert!(world.get::<Prefab>(stem).is_none());
    let local = world.get::<Position>(stem).unwrap().pos;
    assert!(approx_eq(local.x, 0.1));
    assert!(approx_eq(local.y, 0.03));
}

#[test]
fn spawn_lifetime_despawns_clone() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let (_, spawn_parent) = spawn_prefab_scene(&mut world);
    let spawner = spawn_spawner(&mut world, &["apple"], spawn_parent);
    world.get_mut::<Spawner>(spawner).unwrap().lifetime = Some(0.5);

    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);
    let clones = clones_named(&mut world, "apple_01");
    assert_eq!(clones.len(), 1);
    assert!(world.get::<Ttl>(clones[0]).is_some());

    // Turn off so nothing else spawns
    set_space(&mut world, false);
    tick(&mut world, &mut schedule, 0.1);
    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);
    set_space(&mut world, false);
    for _ in 0..10 {
        tick(&mut world, &mut schedule, 0.1);
    }
    assert!(world.get_entity(clones[0]).is_err());
}

// =============================================================================
// Physics
// =============================================================================

#[test]
fn physics_rests_body_on_floor() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let ball = world
        .spawn((
            Position::new(0.0, 1.0, 0.0),
            SphereCollider::new(0.1),
            PhysicsBody::new(),
        ))
        .id();

    for _ in 0..120 {
        tick(&mut world, &mut schedule, 1.0 / 60.0);
    }
    let pos = world.get::<Position>(ball).unwrap().pos;
    assert!(approx_eq(pos.y, 0.1));
    assert!(approx_eq(world.get::<PhysicsBody>(ball).unwrap().velocity.y, 0.0));
}

#[test]
fn physics_skips_prefabs_and_inactive_bodies() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let template = world
        .spawn((Prefab, Position::new(0.0, 1.0, 0.0), PhysicsBody::new()))
        .id();
    let inactive = world
        .spawn((
            Position::new(0.0, 1.0, 0.0),
            PhysicsBody::new().deactivated(),
        ))
        .id();

    for _ in 0..10 {
        tick(&mut world, &mut schedule, 0.1);
    }
    assert!(approx_eq(world.get::<Position>(template).unwrap().pos.y, 1.0));
    assert!(approx_eq(world.get::<Position>(inactive).unwrap().pos.y, 1.0));
}

// =============================================================================
// Music
// =============================================================================

fn spawn_music(world: &mut World) -> Entity {
    world
        .spawn((
            space_tracker(),
            MusicPlayer::new("bgm", "./assets/music.ogg").with_volume(0.5),
        ))
        .id()
}

fn deliver(world: &mut World, msg: AudioMessage) {
    world.resource_mut::<Messages<AudioMessage>>().write(msg);
}

#[test]
fn music_load_requested_once_when_added() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    spawn_music(&mut world);

    tick(&mut world, &mut schedule, 0.1);
    world.clear_trackers();
    tick(&mut world, &mut schedule, 0.1);

    let cmds = drain_audio_cmds(&mut world);
    assert_eq!(
        cmds,
        vec![AudioCmd::LoadMusic {
            id: "bgm".into(),
            path: "./assets/music.ogg".into()
        }]
    );
}

#[test]
fn music_toggle_plays_then_stops() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let music = spawn_music(&mut world);

    tick(&mut world, &mut schedule, 0.1);
    deliver(&mut world, AudioMessage::MusicLoaded { id: "bgm".into() });
    tick(&mut world, &mut schedule, 0.1);
    assert_eq!(
        world.get::<MusicPlayer>(music).unwrap().state,
        PlaybackState::Ready
    );
    drain_audio_cmds(&mut world);

    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);
    assert_eq!(
        drain_audio_cmds(&mut world),
        vec![
            AudioCmd::ResumeOutput,
            AudioCmd::VolumeMusic {
                id: "bgm".into(),
                vol: 0.5
            },
            AudioCmd::PlayMusic {
                id: "bgm".into(),
                looped: true
            },
        ]
    );
    assert!(world.get::<MusicPlayer>(music).unwrap().is_playing());
    assert!(world.get::<ActivationTracker>(music).unwrap().active);

    set_space(&mut world, false);
    tick(&mut world, &mut schedule, 0.1);
    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);
    assert_eq!(
        drain_audio_cmds(&mut world),
        vec![AudioCmd::StopMusic { id: "bgm".into() }]
    );
    assert!(!world.get::<MusicPlayer>(music).unwrap().is_playing());
    assert!(!world.get::<ActivationTracker>(music).unwrap().active);
}

#[test]
fn music_toggle_before_load_is_ignored() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let music = spawn_music(&mut world);

    tick(&mut world, &mut schedule, 0.1);
    drain_audio_cmds(&mut world);

    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);
    assert!(drain_audio_cmds(&mut world).is_empty());
    assert!(!world.get::<ActivationTracker>(music).unwrap().active);
}

#[test]
fn music_load_failure_marks_failed() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let music = spawn_music(&mut world);

    tick(&mut world, &mut schedule, 0.1);
    deliver(
        &mut world,
        AudioMessage::MusicLoadFailed {
            id: "bgm".into(),
            error: "missing".into(),
        },
    );
    tick(&mut world, &mut schedule, 0.1);
    assert_eq!(
        world.get::<MusicPlayer>(music).unwrap().state,
        PlaybackState::Failed
    );
}

#[test]
fn music_natural_finish_returns_to_ready() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let music = spawn_music(&mut world);
    world.get_mut::<MusicPlayer>(music).unwrap().looped = false;

    tick(&mut world, &mut schedule, 0.1);
    deliver(&mut world, AudioMessage::MusicLoaded { id: "bgm".into() });
    tick(&mut world, &mut schedule, 0.1);
    set_space(&mut world, true);
    tick(&mut world, &mut schedule, 0.1);
    assert!(world.get::<MusicPlayer>(music).unwrap().is_playing());

    deliver(&mut world, AudioMessage::MusicFinished { id: "bgm".into() });
    tick(&mut world, &mut schedule, 0.1);
    assert_eq!(
        world.get::<MusicPlayer>(music).unwrap().state,
        PlaybackState::Ready
    );
    assert!(!world.get::<ActivationTracker>(music).unwrap().active);
}

#[test]
fn music_despawn_stops_and_unloads() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let music = spawn_music(&mut world);

    tick(&mut world, &mut schedule, 0.1);
    drain_audio_cmds(&mut world);

    world.despawn(music);
    tick(&mut world, &mut schedule, 0.1);
    assert_eq!(
        drain_audio_cmds(&mut world),
        vec![
            AudioCmd::StopMusic { id: "bgm".into() },
            AudioCmd::UnloadMusic { id: "bgm".into() },
        ]
    );
}
