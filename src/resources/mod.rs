//! ECS resources made available to systems.
//!
//! Overview
//! - `audio` – bridge and channels for the background audio thread
//! - `input` – per-frame keyboard and controller state relevant to the scene
//! - `sceneconfig` – scene configuration loaded from `config.ini`
//! - `worldtime` – simulation time and delta
pub mod audio;
pub mod input;
pub mod sceneconfig;
pub mod worldtime;
