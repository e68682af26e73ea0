//! Rotation component stored as a unit quaternion.

use bevy_ecs::prelude::Component;
use raylib::prelude::Quaternion;

/// Rotation relative to the `ChildOf` parent.
#[derive(Component, Clone, Copy, Debug)]
pub struct Orientation {
    pub quat: Quaternion,
}

impl Orientation {
    pub fn identity() -> Self {
        Self {
            quat: Quaternion {
                x: 0.0,
                y: 0.0,
                z: 0.0,
                w: 1.0,
            },
        }
    }

    /// Rotation of `radians` about the vertical (+Y) axis.
    pub fn from_yaw(radians: f32) -> Self {
        let (sin, cos) = (radians * 0.5).sin_cos();
        Self {
            quat: Quaternion {
                x: 0.0,
                y: sin,
                z: 0.0,
                w: cos,
            },
        }
    }

    /// Yaw angle in radians in `(-π, π]`, assuming a pure Y rotation.
    pub fn yaw(&self) -> f32 {
        2.0 * self.quat.y.atan2(self.quat.w)
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}
