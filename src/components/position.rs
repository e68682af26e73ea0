use bevy_ecs::prelude::Component;
use raylib::prelude::Vector3;

/// Translation relative to the `ChildOf` parent, in meters. Y is up.
#[derive(Component, Clone, Copy, Debug)]
pub struct Position {
    pub pos: Vector3,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            pos: Vector3::new(x, y, z),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}
