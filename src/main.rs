//! XR spawner main entry point.
//!
//! A small 3D scene written in Rust using:
//! - **raylib** for windowing, 3D drawing, input, and audio
//! - **bevy_ecs** for entity-component-system architecture
//!
//! A spawner floats above the floor and, while toggled on, drops a random
//! prefab (apple, banana, crate) every couple of seconds. Background music is
//! toggled with a second binding. Each action listens to a keyboard key and a
//! button on a hand controller; a connected gamepad stands in for the pair of
//! controllers.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` and open the raylib window
//! 2. Build the ECS world, start the audio thread and build the scene
//! 3. Register observers and systems
//! 4. Each frame: poll input, sample toggles, fire schedules, spawn, step
//!    physics, pump audio, draw
//! 5. Stop the audio thread on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --config ./config.ini
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;
use raylib::prelude::*;

use xrspawner::resources::audio::{setup_audio, shutdown_audio};
use xrspawner::resources::input::InputState;
use xrspawner::resources::sceneconfig::SceneConfig;
use xrspawner::resources::worldtime::WorldTime;
use xrspawner::scene::build_scene;
use xrspawner::systems::activation::activation_system;
use xrspawner::systems::audio::{
    forward_audio_cmds, poll_audio_messages, update_bevy_audio_cmds, update_bevy_audio_messages,
};
use xrspawner::systems::input::{ControllerGamepad, update_input_state};
use xrspawner::systems::music::{
    music_load_system, music_state_system, music_teardown_system, music_toggle_observer,
};
use xrspawner::systems::physics::physics_system;
use xrspawner::systems::prefab::resolve_spawner_targets;
use xrspawner::systems::render::{render_hud, render_pass};
use xrspawner::systems::schedule::recurring_schedule_system;
use xrspawner::systems::spawner::spawn_observer;
use xrspawner::systems::time::update_world_time;
use xrspawner::systems::ttl::ttl_system;

/// XR object spawner
#[derive(Parser)]
#[command(
    version,
    about = "Spawns prefab objects and toggles background music from keyboard or hand controllers."
)]
struct Cli {
    /// Configuration file to load (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => SceneConfig::with_path(path),
        None => SceneConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        log::warn!("{} ({}), using defaults", e, config.config_path.display());
    }

    // Early-exit: write the configuration and quit (no window/audio needed)
    if cli.write_config {
        match config.save_to_file() {
            Ok(()) => println!("Configuration written to {}", config.config_path.display()),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    log::info!("Starting xrspawner");
    // --------------- Raylib window ---------------
    let (mut rl, thread) = raylib::init()
        .size(config.window_width as i32, config.window_height as i32)
        .resizable()
        .title("XR Spawner")
        .build();
    rl.set_target_fps(config.target_fps);
    // Disable ESC to exit
    rl.set_exit_key(None);

    let camera = Camera3D::perspective(
        Vector3::new(3.0, 2.5, 3.0),
        Vector3::new(0.0, 0.5, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        45.0,
    );

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(1.0));
    world.insert_resource(InputState::default());
    world.insert_resource(ControllerGamepad(config.gamepad));

    // Init audio; it must go before the scene so LoadMusic has a receiver
    setup_audio(&mut world, config.music_start_suspended);

    world.insert_non_send_resource(rl);

    // Ensure the observers are registered before we run any systems that may trigger events.
    world.spawn(Observer::new(spawn_observer));
    world.spawn(Observer::new(music_toggle_observer));
    world.flush();

    build_scene(&mut world, &config);
    world.insert_resource(config);

    let mut update = Schedule::default();
    update.add_systems(
        (
            resolve_spawner_targets,
            update_input_state,
            activation_system,
            recurring_schedule_system,
            physics_system,
            ttl_system,
        )
            .chain(),
    );
    update.add_systems(
        // audio systems must be together
        (
            music_load_system,
            music_teardown_system,
            // First, advance AudioCmd messages and forward them to the audio thread
            update_bevy_audio_cmds,
            forward_audio_cmds,
            // Then, pull audio thread messages and advance them
            poll_audio_messages,
            update_bevy_audio_messages,
            music_state_system,
        )
            .chain()
            .after(ttl_system),
    );

    if let Err(e) = update.initialize(&mut world) {
        log::error!("Failed to initialize schedule: {}", e);
        shutdown_audio(&mut world);
        return;
    }

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
    {
        let dt = world
            .non_send_resource::<raylib::RaylibHandle>()
            .get_frame_time();
        update_world_time(&mut world, dt);

        update.run(&mut world);

        world.clear_trackers(); // Clear changed components for next frame

        let Some(mut rl) = world.remove_non_send_resource::<raylib::RaylibHandle>() else {
            break;
        };
        {
            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::RAYWHITE);
            {
                let mut d3 = d.begin_mode3D(camera);
                render_pass(&mut world, &mut d3);
            }
            render_hud(&mut world, &mut d);
        }
        world.insert_non_send_resource(rl);
    }
    shutdown_audio(&mut world);
}
