//! Reminder job planner: groups the day's occurrences into trigger plans.
//!
//! Grouping of same-instant reminders into one plan entry is an explicit
//! step here, not something the timer-firing path special-cases.

use chrono::{Duration, NaiveDateTime};
use indexmap::IndexMap;

use crate::calculator::Occurrence;

/// Mapping trigger instant → ordered activity names sharing that instant.
///
/// Within one planning call each trigger instant appears exactly once;
/// insertion order follows the occurrences' sorted order, so iteration
/// yields triggers in non-decreasing time order.
pub type TriggerPlan = IndexMap<NaiveDateTime, Vec<String>>;

/// Plan reminder triggers for the day's occurrences.
///
/// Each occurrence contributes trigger = start − `lead`. Occurrences with
/// identical trigger instants merge into one entry, names kept in their
/// sorted occurrence order. The same activity appearing twice at one
/// trigger instant collapses to a single name entry. Past triggers are
/// retained; the scheduler decides at arm time whether to skip them.
pub fn plan_triggers(occurrences: &[Occurrence], lead: Duration) -> TriggerPlan {
    debug_assert!(lead >= Duration::zero(), "lead offset must be >= 0");

    let mut plan = TriggerPlan::new();
    for occ in occurrences {
        let trigger = occ.start - lead;
        let names = plan.entry(trigger).or_default();
        if !names.contains(&occ.activity) {
            names.push(occ.activity.clone());
        }
    }
    plan
}
