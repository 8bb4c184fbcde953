//! Timeline calculator: expands activity definitions into the day's
//! concrete occurrence list for a given reference instant.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::schema::ActivitySet;

/// One concrete calendar instance of an activity on a given day.
///
/// Derived and ephemeral: recomputed per query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// Activity name.
    pub activity: String,
    /// Concrete start instant (date + time-of-day).
    pub start: NaiveDateTime,
    /// Concrete end instant (start + duration; start itself when the
    /// definition has no duration).
    pub end: NaiveDateTime,
    /// Whether the reference instant falls in [start, end). A zero-length
    /// occurrence spans an empty interval and is never observably active.
    pub is_active_now: bool,
    /// Whether this is the activity's last occurrence of the day (maximum
    /// start time among its occurrences today).
    pub is_last_of_day: bool,
}

/// The renderer-facing result of a timeline query.
///
/// An empty occurrence list is an explicit "no activities today" signal,
/// not an error; the external renderer draws a placeholder for it.
#[derive(Debug, Clone, Serialize)]
pub struct DaySnapshot {
    /// The queried calendar date.
    pub date: chrono::NaiveDate,
    /// Ordered, annotated occurrences for that date.
    pub occurrences: Vec<Occurrence>,
}

impl DaySnapshot {
    /// Whether no activities matched the queried day.
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

/// Compute the ordered, annotated occurrence list for the reference
/// instant's day.
///
/// Pure given its two inputs. Output is sorted by start time ascending with
/// ties broken by activity name, so merged rendering and downstream trigger
/// ordering are deterministic. Returns an empty vector when no definition
/// matches the reference weekday.
pub fn compute_occurrences(set: &ActivitySet, reference: NaiveDateTime) -> Vec<Occurrence> {
    let date = reference.date();
    let weekday = date.weekday();

    let mut occurrences: Vec<Occurrence> = Vec::new();
    for def in set.iter() {
        if !def.days.matches(weekday) {
            continue;
        }
        let last_start = def.start_times.last().copied();
        for &time in &def.start_times {
            let start = date.and_time(time);
            let end = match def.duration {
                Some(d) => start + d,
                None => start,
            };
            occurrences.push(Occurrence {
                activity: def.name.clone(),
                start,
                end,
                is_active_now: reference >= start && reference < end,
                is_last_of_day: last_start == Some(time),
            });
        }
    }

    occurrences.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.activity.cmp(&b.activity)));
    occurrences
}

/// Timeline query entry point for the picture-request path: the occurrence
/// list plus an explicit emptiness signal for the external renderer.
pub fn day_snapshot(set: &ActivitySet, reference: NaiveDateTime) -> DaySnapshot {
    DaySnapshot {
        date: reference.date(),
        occurrences: compute_occurrences(set, reference),
    }
}
