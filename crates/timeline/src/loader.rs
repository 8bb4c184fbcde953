//! JSON file loader for activity definitions.
//!
//! Reads the definitions file once at startup. A single malformed entry is
//! skipped and reported per entry; it never aborts loading the rest. A file
//! that cannot be read or is not valid JSON at all fails the whole load.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::schema::{ActivityDefinition, ActivitySet, RawActivity};

/// Outcome of validating a single definition entry.
#[derive(Debug)]
pub struct LoadResult {
    /// Activity name (the entry's map key).
    pub name: String,
    /// Status of the validation attempt.
    pub status: LoadStatus,
}

/// Status of a single entry validation.
#[derive(Debug)]
pub enum LoadStatus {
    /// Entry was successfully validated and loaded.
    Loaded,
    /// Validation error occurred; the entry was skipped.
    Failed { error: String },
}

/// Load and validate all activity definitions from a JSON file.
///
/// Returns the set of valid definitions plus a per-entry report. Skipped
/// entries are also logged at warn level.
pub fn load_activities(path: &Path) -> Result<(ActivitySet, Vec<LoadResult>)> {
    let text = fs::read_to_string(path)?;
    let raw: BTreeMap<String, RawActivity> = serde_json::from_str(&text)?;

    let mut definitions = Vec::with_capacity(raw.len());
    let mut results = Vec::with_capacity(raw.len());

    for (name, entry) in &raw {
        match ActivityDefinition::from_raw(name, entry) {
            Ok(def) => {
                definitions.push(def);
                results.push(LoadResult {
                    name: name.clone(),
                    status: LoadStatus::Loaded,
                });
            }
            Err(e) => {
                warn!(activity = %name, error = %e, "skipping malformed activity definition");
                results.push(LoadResult {
                    name: name.clone(),
                    status: LoadStatus::Failed {
                        error: e.to_string(),
                    },
                });
            }
        }
    }

    let set = ActivitySet::new(definitions);
    info!(
        path = %path.display(),
        loaded = set.len(),
        skipped = results.len() - set.len(),
        "activity definitions loaded"
    );
    Ok((set, results))
}
