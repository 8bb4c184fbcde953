//! Scheduler error types.

use crate::store::StoreError;

/// Errors surfaced by scheduler engine operations.
///
/// A store failure during enable/disable leaves the in-memory schedule
/// state untouched, so memory and disk never disagree about whether a
/// tenant is enabled.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("tenant state store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;
