//! Fire events produced by recurring schedules.
//!
//! [`FireEvent`] is triggered by
//! [`recurring_schedule_system`](crate::systems::schedule::recurring_schedule_system)
//! each time a [`RecurringSchedule`](crate::components::schedule::RecurringSchedule)
//! fires. [`spawn_observer`](crate::systems::spawner::spawn_observer) reacts
//! to it on entities carrying a `Spawner`.

use bevy_ecs::prelude::*;

/// Why a schedule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireKind {
    /// The tracker just became active.
    Immediate,
    /// A full interval elapsed while active.
    Recurring,
}

/// Event emitted when a schedule fires.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireEvent {
    /// The entity owning the schedule.
    pub entity: Entity,
    pub kind: FireKind,
}
