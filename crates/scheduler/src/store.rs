//! Durable tenant → enabled mapping.
//!
//! A small JSON file shaped like `{"<tenant>": {"enabled": true}}`. Writes
//! go through a temp file + rename and complete before the mutating call
//! returns; the in-memory map is committed only after the file write
//! succeeds, so a crash right after enabling cannot leave the resume state
//! inconsistent with what the caller was told.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Errors that can occur during tenant state persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persisted per-tenant state.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TenantState {
    enabled: bool,
}

/// File-backed store of per-tenant reminder enablement.
pub struct TenantStateStore {
    path: PathBuf,
    states: Mutex<BTreeMap<String, TenantState>>,
}

impl TenantStateStore {
    /// Open the store, reading existing state from disk.
    ///
    /// A missing file is an empty store; an unreadable or unparsable file
    /// is an error (see [`open_or_default`](Self::open_or_default) for the
    /// log-and-continue variant used on the resume path).
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let states = if path.exists() {
            let text = fs::read_to_string(path)?;
            serde_json::from_str(&text)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            states: Mutex::new(states),
        })
    }

    /// Open the store, falling back to an empty one on read failure.
    ///
    /// Used at process start so a corrupt state file degrades to "zero
    /// resumed tenants" instead of crashing the worker.
    pub fn open_or_default(path: &Path) -> Self {
        match Self::open(path) {
            Ok(store) => store,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "tenant state unreadable, starting empty");
                Self {
                    path: path.to_path_buf(),
                    states: Mutex::new(BTreeMap::new()),
                }
            }
        }
    }

    /// Whether reminders are enabled for the tenant (default false).
    pub fn get(&self, tenant: &str) -> bool {
        self.states
            .lock()
            .unwrap()
            .get(tenant)
            .map(|s| s.enabled)
            .unwrap_or(false)
    }

    /// Persist the tenant's enabled flag. Durable before return.
    ///
    /// The in-memory map is updated only after the file write succeeds.
    pub fn set_enabled(&self, tenant: &str, enabled: bool) -> Result<(), StoreError> {
        let mut states = self.states.lock().unwrap();

        let mut next = states.clone();
        next.insert(tenant.to_string(), TenantState { enabled });
        self.persist(&next)?;
        *states = next;

        debug!(tenant, enabled, "tenant state persisted");
        Ok(())
    }

    /// All tenants currently marked enabled, for startup resume.
    pub fn all_enabled(&self) -> Vec<String> {
        self.states
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s)| s.enabled)
            .map(|(t, _)| t.clone())
            .collect()
    }

    /// Write the full map via temp file + rename.
    fn persist(&self, states: &BTreeMap<String, TenantState>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(states)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
