//! Recurring schedule system.
//!
//! Ticks every [`RecurringSchedule`] with its entity's activation flag and
//! the frame delta from [`WorldTime`], triggering a [`FireEvent`] whenever the
//! schedule fires.

use bevy_ecs::prelude::*;

use crate::components::activation::ActivationTracker;
use crate::components::schedule::RecurringSchedule;
use crate::events::spawn::{FireEvent, FireKind};
use crate::resources::worldtime::WorldTime;

pub fn recurring_schedule_system(
    time: Res<WorldTime>,
    mut query: Query<(Entity, &ActivationTracker, &mut RecurringSchedule)>,
    mut commands: Commands,
) {
    for (entity, tracker, mut schedule) in query.iter_mut() {
        let decision = schedule.tick(time.delta, time.elapsed, tracker.active);
        let kind = if decision.immediate {
            FireKind::Immediate
        } else if decision.recurring {
            FireKind::Recurring
        } else {
            continue;
        };
        commands.trigger(FireEvent { entity, kind });
    }
}
