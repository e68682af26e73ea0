//! Renderable shape and tint components.
//!
//! Together with [`SphereCollider`](crate::components::collider::SphereCollider)
//! and [`PhysicsBody`](crate::components::physicsbody::PhysicsBody) these form
//! the component set a spawn copies from its prefab.

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Vector3};

/// Primitive mesh drawn at the entity's world position.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Cube { size: Vector3 },
    Sphere { radius: f32 },
}

impl Shape {
    /// Half the vertical extent; used to rest shapes on the floor.
    pub fn half_height(&self) -> f32 {
        match self {
            Shape::Cube { size } => size.y * 0.5,
            Shape::Sphere { radius } => *radius,
        }
    }
}

/// Color used when drawing a [`Shape`].
#[derive(Component, Clone, Debug, Copy)]
pub struct Tint {
    pub color: Color,
}

impl Tint {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            color: Color::new(r, g, b, a),
        }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
        }
    }
}
