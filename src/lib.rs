//! XR spawner library.
//!
//! This module exposes the ECS components, resources, systems, and events
//! for use in integration tests and by the binary.

pub mod components;
pub mod events;
pub mod resources;
pub mod scene;
pub mod systems;
