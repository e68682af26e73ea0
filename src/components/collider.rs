use bevy_ecs::prelude::Component;

/// Sphere collision volume centred on the entity's position.
///
/// The physics step uses it to keep bodies above the floor.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct SphereCollider {
    pub radius: f32,
}

impl SphereCollider {
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.abs(),
        }
    }
}
