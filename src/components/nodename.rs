//! Scene-graph naming and marker components.
//!
//! - [`NodeName`] – the human name of a scene node, used to resolve prefabs
//! - [`SceneRoot`] – marks the node the prefab resolver starts from
//! - [`Prefab`] – marks template entities that are cloned, never simulated or drawn

use bevy_ecs::prelude::Component;

/// Human-readable name of a scene node.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct NodeName(pub String);

impl NodeName {
    pub fn new(name: impl Into<String>) -> Self {
        NodeName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Tag for the root of the scene graph.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct SceneRoot;

/// Tag for template entities. Removed from clones.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Prefab;
