//! ECS components for entities.
//!
//! Submodules overview:
//! - [`activation`] – edge-triggered toggle over keyboard and controller sources
//! - [`collider`] – sphere collision volume
//! - [`musicplayer`] – background music stream and its playback state
//! - [`nodename`] – scene node names plus the scene root and prefab markers
//! - [`orientation`] – rotation as a unit quaternion
//! - [`physicsbody`] – velocity, gravity and bounce for dynamic bodies
//! - [`position`] – translation relative to the parent
//! - [`schedule`] – recurring action timing with a minimum interval
//! - [`shape`] – primitive mesh and tint used for drawing
//! - [`spawner`] – prefab names and placement settings for spawning
//! - [`ttl`] – time-to-live countdown for spawned objects

pub mod activation;
pub mod collider;
pub mod musicplayer;
pub mod nodename;
pub mod orientation;
pub mod physicsbody;
pub mod position;
pub mod schedule;
pub mod shape;
pub mod spawner;
pub mod ttl;
