//! Engine systems.
//!
//! This module groups all ECS systems and observers that advance input,
//! activation, spawning, audio and rendering.
//!
//! Submodules overview
//! - [`activation`] – sample activation trackers and trigger toggle events
//! - [`audio`] – bridge with the audio thread (poll/update message queues)
//! - [`input`] – read hardware input and update [`crate::resources::input::InputState`]
//! - [`music`] – load music players and toggle playback
//! - [`physics`] – integrate gravity and keep bodies above the floor
//! - [`prefab`] – resolve spawner prefab names against the scene graph
//! - [`render`] – draw the 3D scene and the status overlay using Raylib
//! - [`schedule`] – tick recurring schedules and trigger fire events
//! - [`spawner`] – clone prefabs when a spawner fires
//! - [`time`] – update simulation time and delta
//! - [`ttl`] – despawn entities whose lifetime ran out

pub mod activation;
pub mod audio;
pub mod input;
pub mod music;
pub mod physics;
pub mod prefab;
pub mod render;
pub mod schedule;
pub mod spawner;
pub mod time;
pub mod ttl;
