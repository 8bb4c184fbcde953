//! Activity timeline model for recurring in-game events.
//!
//! This crate provides:
//! - Activity definition schema and JSON file loader
//! - Timeline calculator: definitions + a reference instant → the day's
//!   ordered, annotated occurrence list
//! - Reminder job planner: occurrences + a lead offset → deduplicated
//!   trigger plans (trigger instant → merged activity names)
//!
//! All computations are pure given their inputs; the reference instant is
//! always an explicit parameter so callers (and tests) control "now".

pub mod calculator;
pub mod error;
pub mod loader;
pub mod planner;
pub mod schema;

#[cfg(test)]
mod tests;

pub use calculator::{compute_occurrences, day_snapshot, DaySnapshot, Occurrence};
pub use error::{Result, TimelineError};
pub use loader::{load_activities, LoadResult, LoadStatus};
pub use planner::{plan_triggers, TriggerPlan};
pub use schema::{ActivityDefinition, ActivitySet, DayRule};
