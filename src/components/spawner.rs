//! Timed object spawner component.
//!
//! The [`Spawner`] component clones a random prefab near its own position each
//! time its [`RecurringSchedule`](crate::components::schedule::RecurringSchedule)
//! fires.
//!
//! # How It Works
//!
//! 1. The entity carries an [`ActivationTracker`], a `RecurringSchedule` and a
//!    `Spawner` holding the requested prefab names.
//! 2. `resolve_spawner_targets` resolves the names against the scene once and
//!    stores the matching prefab entities in `targets`.
//! 3. A rising edge on any activation source toggles spawning; while active the
//!    schedule emits [`FireEvent`]s and `spawn_observer` clones a random target.
//!
//! Names may repeat; a repeated name resolves to the same prefab twice, which
//! doubles its chance of being picked.
//!
//! # Related
//!
//! - [`crate::systems::prefab`] – name resolution
//! - [`crate::systems::spawner::spawn_observer`] – the spawn action
//!
//! [`ActivationTracker`]: crate::components::activation::ActivationTracker
//! [`FireEvent`]: crate::events::spawn::FireEvent

use bevy_ecs::prelude::*;
use raylib::prelude::Vector3;

/// Default horizontal jitter width in meters.
pub const DEFAULT_SPREAD: f32 = 0.5;

#[derive(Component, Debug, Clone)]
pub struct Spawner {
    /// Requested prefab names, in order, duplicates allowed.
    pub target_names: Vec<String>,
    /// Resolved prefab entities. Filled once by the resolver.
    pub targets: Vec<Entity>,
    /// Whether resolution already ran.
    pub resolved: bool,
    /// Width of the uniform jitter square on X and Z, centred on the spawner.
    pub spread: f32,
    /// Entity that spawned objects are parented to. `None` spawns at the root.
    pub parent: Option<Entity>,
    /// Reserved positional offset, not applied yet.
    pub offset: Vector3,
    /// Reserved jitter volume, not applied yet.
    pub random_area: Vector3,
    /// Seconds before a spawned object despawns. `None` keeps it forever.
    pub lifetime: Option<f32>,
}

impl Spawner {
    pub fn new<I, S>(target_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_names: target_names.into_iter().map(Into::into).collect(),
            targets: Vec::new(),
            resolved: false,
            spread: DEFAULT_SPREAD,
            parent: None,
            offset: Vector3::zero(),
            random_area: Vector3::zero(),
            lifetime: None,
        }
    }

    /// Parse a comma-separated list of names. Blank entries are dropped.
    pub fn from_list(list: &str) -> Self {
        Self::new(parse_name_list(list))
    }

    /// Horizontal jitter width. Negative values are mirrored, non-finite
    /// values fall back to [`DEFAULT_SPREAD`].
    pub fn with_spread(mut self, spread: f32) -> Self {
        self.spread = if spread.is_finite() {
            spread.abs()
        } else {
            DEFAULT_SPREAD
        };
        self
    }

    pub fn with_parent(mut self, parent: Entity) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_lifetime(mut self, seconds: f32) -> Self {
        self.lifetime = if seconds > 0.0 { Some(seconds) } else { None };
        self
    }
}

/// Split a comma-separated name list, trimming whitespace and dropping blanks.
pub fn parse_name_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
