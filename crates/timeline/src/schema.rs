//! Activity definition schema: serde forms and validated in-memory types.

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

/// Sentinel day token matching every weekday.
const EVERYDAY: &str = "everyday";

/// Which weekdays an activity applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayRule {
    /// The activity runs every day of the week.
    Everyday,
    /// The activity runs only on this subset of weekdays.
    Days(HashSet<Weekday>),
}

impl DayRule {
    /// Whether the rule matches the given weekday.
    pub fn matches(&self, weekday: Weekday) -> bool {
        match self {
            DayRule::Everyday => true,
            DayRule::Days(days) => days.contains(&weekday),
        }
    }

    /// Parse day tokens ("Monday".."Sunday", or the "Everyday" sentinel).
    ///
    /// The sentinel wins over any listed weekdays, matching the original
    /// config semantics where "Everyday" short-circuits the day check.
    pub fn parse(tokens: &[String]) -> Result<Self> {
        if tokens.is_empty() {
            return Err(TimelineError::Validation("days must be non-empty".into()));
        }
        if tokens.iter().any(|t| t.trim().eq_ignore_ascii_case(EVERYDAY)) {
            return Ok(DayRule::Everyday);
        }
        let mut days = HashSet::new();
        for token in tokens {
            let day: Weekday = token
                .trim()
                .parse()
                .map_err(|_| TimelineError::Validation(format!("unknown weekday: '{token}'")))?;
            days.insert(day);
        }
        Ok(DayRule::Days(days))
    }
}

/// Raw serde form of one activity entry, as it appears in the JSON file:
/// `{"days": [...], "start_times": ["HH:MM", ...], "duration_minutes": 60}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawActivity {
    pub days: Vec<String>,
    pub start_times: Vec<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

/// A validated activity definition. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDefinition {
    /// Unique activity name (the map key in the definitions file).
    pub name: String,
    /// Applicable weekdays.
    pub days: DayRule,
    /// Start times-of-day, sorted ascending, duplicates removed.
    pub start_times: Vec<NaiveTime>,
    /// Occurrence length. None = point-in-time (zero-length).
    pub duration: Option<Duration>,
}

impl ActivityDefinition {
    /// Validate a raw entry into a definition.
    pub fn from_raw(name: &str, raw: &RawActivity) -> Result<Self> {
        let days = DayRule::parse(&raw.days)?;

        if raw.start_times.is_empty() {
            return Err(TimelineError::Validation(format!(
                "activity '{name}': start_times must be non-empty"
            )));
        }
        let mut start_times = Vec::with_capacity(raw.start_times.len());
        for t in &raw.start_times {
            let parsed = NaiveTime::parse_from_str(t.trim(), "%H:%M").map_err(|_| {
                TimelineError::Validation(format!("activity '{name}': unparsable time '{t}'"))
            })?;
            start_times.push(parsed);
        }
        // Source order may be unsorted; one occurrence per (activity, time) pair.
        start_times.sort();
        start_times.dedup();

        let duration = match raw.duration_minutes {
            None => None,
            Some(m) if m > 0 => Some(Duration::minutes(m)),
            Some(m) => {
                return Err(TimelineError::Validation(format!(
                    "activity '{name}': duration_minutes must be positive, got {m}"
                )))
            }
        };

        Ok(Self {
            name: name.to_string(),
            days,
            start_times,
            duration,
        })
    }
}

/// The full set of loaded activity definitions, keyed by name.
///
/// Read-only after load; safe to share across tenants behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ActivitySet {
    activities: BTreeMap<String, ActivityDefinition>,
}

impl ActivitySet {
    /// Build a set from validated definitions. Later duplicates replace
    /// earlier ones (names are unique keys).
    pub fn new(definitions: impl IntoIterator<Item = ActivityDefinition>) -> Self {
        Self {
            activities: definitions
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        }
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Option<&ActivityDefinition> {
        self.activities.get(name)
    }

    /// Iterate definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ActivityDefinition> {
        self.activities.values()
    }

    /// Number of loaded definitions.
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether no definitions were loaded.
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}
