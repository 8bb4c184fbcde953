//! Per-tenant schedule state: armed triggers and the standing reset job.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tokio::task::JoinHandle;

/// One armed one-shot trigger: merged activity names plus the timer task.
pub(crate) struct ArmedTrigger {
    /// Activity names sharing this trigger instant, in planned order.
    pub names: Vec<String>,
    /// The sleeping timer task. Aborted on cancellation.
    pub handle: JoinHandle<()>,
}

/// Live schedule for one tenant. Mutated exclusively through the engine,
/// under the tenant's async mutex.
pub(crate) struct TenantSchedule {
    /// Cancellation epoch. A timer task fires only if the epoch it was
    /// armed under is still current, so a fire racing a cancellation
    /// resolves to at most one of the two taking effect.
    pub epoch: u64,
    /// Armed triggers for "today", keyed by trigger instant.
    pub triggers: BTreeMap<NaiveDateTime, ArmedTrigger>,
    /// Handle of the standing 00:01 daily-reset task.
    pub reset_job: Option<JoinHandle<()>>,
}

impl TenantSchedule {
    pub fn new() -> Self {
        Self {
            epoch: 0,
            triggers: BTreeMap::new(),
            reset_job: None,
        }
    }

    /// Cancel all armed triggers, leaving the reset job untouched.
    pub fn cancel_triggers(&mut self) {
        self.epoch += 1;
        for (_, trigger) in std::mem::take(&mut self.triggers) {
            trigger.handle.abort();
        }
    }

    /// Cancel everything including the standing reset job.
    pub fn cancel_all(&mut self) {
        self.cancel_triggers();
        if let Some(handle) = self.reset_job.take() {
            handle.abort();
        }
    }
}
