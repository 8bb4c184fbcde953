//! The scheduler engine: one process-wide instance owning every tenant's
//! armed reminder triggers.
//!
//! Each trigger instant becomes a cancellable one-shot tokio task. Timer
//! tasks hold only a weak reference to the engine, so dropping the engine
//! (or calling [`shutdown`](SchedulerEngine::shutdown)) tears everything
//! down without reference cycles.
//!
//! Operations take `now` as an explicit parameter: production callers pass
//! `Local::now().naive_local()`, tests pass fixed instants.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, Weak};

use chrono::{Duration, Local, NaiveDateTime};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use gameday_notify::{Notifier, Reminder};
use gameday_timeline::{compute_occurrences, plan_triggers, ActivitySet, TriggerPlan};

use crate::error::Result;
use crate::reset;
use crate::schedule::{ArmedTrigger, TenantSchedule};
use crate::store::TenantStateStore;

/// Outcome of arming a tenant's trigger plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnableReport {
    /// Triggers armed for the rest of today.
    pub armed: usize,
    /// Triggers whose instant was already at or before `now` (never armed,
    /// so a late enable does not fire stale reminders).
    pub skipped_past: usize,
}

struct EngineInner {
    /// Read-only after load; shared across all tenants without locking.
    activities: Arc<ActivitySet>,
    store: Arc<TenantStateStore>,
    notifier: Arc<dyn Notifier>,
    /// Fixed lead offset between a trigger and its occurrence start.
    lead: Duration,
    /// Tenant id → schedule. The outer lock only guards map membership and
    /// is never held across an await; per-tenant serialization comes from
    /// the inner async mutex.
    tenants: StdMutex<HashMap<String, Arc<Mutex<TenantSchedule>>>>,
}

/// Cheap-to-clone handle to the process-wide scheduler engine.
#[derive(Clone)]
pub struct SchedulerEngine {
    inner: Arc<EngineInner>,
}

impl SchedulerEngine {
    /// Create a new engine. No tenants are scheduled until
    /// [`enable`](Self::enable) or [`resume_all`](Self::resume_all).
    pub fn new(
        activities: Arc<ActivitySet>,
        store: Arc<TenantStateStore>,
        notifier: Arc<dyn Notifier>,
        lead: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                activities,
                store,
                notifier,
                lead,
                tenants: StdMutex::new(HashMap::new()),
            }),
        }
    }

    /// Enable reminders for a tenant and arm today's triggers.
    ///
    /// Idempotent: re-enabling replaces the tenant's armed triggers from a
    /// fresh plan instead of duplicating them. Persistence happens before
    /// any in-memory schedule mutation; on a store failure nothing is
    /// (re)armed and the error is surfaced.
    pub async fn enable(&self, tenant: &str, now: NaiveDateTime) -> Result<EnableReport> {
        let sched = self.get_or_create(tenant);
        let mut guard = sched.lock().await;

        let plan = self.plan_for(now);
        if let Err(e) = self.inner.store.set_enabled(tenant, true) {
            // A fresh entry created just for this call must not linger: a
            // later disable would mistake it for known state and write to
            // the store for a tenant that was never enabled.
            if guard.triggers.is_empty() && guard.reset_job.is_none() {
                self.inner.tenants.lock().unwrap().remove(tenant);
            }
            return Err(e.into());
        }

        guard.cancel_triggers();
        let report = self.arm_plan(&mut guard, tenant, now, plan);
        if guard.reset_job.is_none() {
            guard.reset_job = Some(self.spawn_reset_job(tenant, now));
        }

        info!(
            tenant,
            armed = report.armed,
            skipped_past = report.skipped_past,
            "reminders enabled"
        );
        Ok(report)
    }

    /// Disable reminders for a tenant: persist enabled=false and cancel
    /// every armed trigger plus the standing reset job.
    ///
    /// Idempotent: an unknown tenant is a no-op success with no store
    /// write. The store write happens under the tenant lock, so it cannot
    /// interleave with a concurrent [`enable`](Self::enable) persisting
    /// and arming the same tenant. The (now empty) schedule entry stays in
    /// the map, keeping that serialization for later calls.
    pub async fn disable(&self, tenant: &str) -> Result<()> {
        if self.get_existing(tenant).is_none() && !self.inner.store.get(tenant) {
            debug!(tenant, "disable on unknown tenant, nothing to do");
            return Ok(());
        }

        let sched = self.get_or_create(tenant);
        let mut guard = sched.lock().await;

        self.inner.store.set_enabled(tenant, false)?;
        guard.cancel_all();

        info!(tenant, "reminders disabled");
        Ok(())
    }

    /// Replace the tenant's armed triggers with a fresh plan computed at
    /// `now`. Invoked by the tenant's standing 00:01 job; public so tests
    /// (and operators) can roll the day explicitly. The standing reset job
    /// itself is left untouched. No-op for tenants without a schedule.
    pub async fn daily_reset(&self, tenant: &str, now: NaiveDateTime) {
        let Some(sched) = self.get_existing(tenant) else {
            return;
        };
        let mut guard = sched.lock().await;

        guard.cancel_triggers();
        let plan = self.plan_for(now);
        let report = self.arm_plan(&mut guard, tenant, now, plan);

        info!(tenant, armed = report.armed, "daily trigger reset");
    }

    /// Resume every tenant the store reports enabled. Per-tenant failures
    /// are logged and skipped; returns the number of tenants resumed.
    pub async fn resume_all(&self, now: NaiveDateTime) -> usize {
        let mut resumed = 0;
        for tenant in self.inner.store.all_enabled() {
            match self.enable(&tenant, now).await {
                Ok(report) => {
                    debug!(tenant = %tenant, armed = report.armed, "tenant resumed");
                    resumed += 1;
                }
                Err(e) => warn!(tenant = %tenant, error = %e, "failed to resume tenant, skipping"),
            }
        }
        info!(resumed, "tenant resume complete");
        resumed
    }

    /// Explicit teardown: cancel every tenant's triggers and reset jobs.
    pub async fn shutdown(&self) {
        let scheds: Vec<_> = self.inner.tenants.lock().unwrap().drain().collect();
        for (_, sched) in scheds {
            sched.lock().await.cancel_all();
        }
        info!("scheduler engine shut down");
    }

    /// Whether the store currently marks the tenant enabled.
    pub fn is_enabled(&self, tenant: &str) -> bool {
        self.inner.store.get(tenant)
    }

    /// The tenant's currently armed trigger instants, ascending.
    pub async fn armed_triggers(&self, tenant: &str) -> Vec<NaiveDateTime> {
        match self.get_existing(tenant) {
            Some(sched) => sched.lock().await.triggers.keys().copied().collect(),
            None => Vec::new(),
        }
    }

    // ── internals ───────────────────────────────────────────────

    fn plan_for(&self, now: NaiveDateTime) -> TriggerPlan {
        let occurrences = compute_occurrences(&self.inner.activities, now);
        plan_triggers(&occurrences, self.inner.lead)
    }

    fn get_or_create(&self, tenant: &str) -> Arc<Mutex<TenantSchedule>> {
        let mut tenants = self.inner.tenants.lock().unwrap();
        tenants
            .entry(tenant.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TenantSchedule::new())))
            .clone()
    }

    fn get_existing(&self, tenant: &str) -> Option<Arc<Mutex<TenantSchedule>>> {
        self.inner.tenants.lock().unwrap().get(tenant).cloned()
    }

    /// Arm all future-dated plan entries under the tenant's current epoch.
    /// Past entries (trigger ≤ now) are counted but never armed.
    fn arm_plan(
        &self,
        guard: &mut TenantSchedule,
        tenant: &str,
        now: NaiveDateTime,
        plan: TriggerPlan,
    ) -> EnableReport {
        let epoch = guard.epoch;
        let mut report = EnableReport {
            armed: 0,
            skipped_past: 0,
        };

        for (at, names) in plan {
            if at <= now {
                report.skipped_past += 1;
                continue;
            }
            let handle = self.spawn_trigger(tenant, at, now, epoch);
            guard.triggers.insert(at, ArmedTrigger { names, handle });
            report.armed += 1;
        }
        report
    }

    /// Spawn the one-shot timer task for a trigger instant.
    fn spawn_trigger(
        &self,
        tenant: &str,
        at: NaiveDateTime,
        now: NaiveDateTime,
        epoch: u64,
    ) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        let tenant = tenant.to_string();
        let delay = (at - now).to_std().unwrap_or_default();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            EngineInner::fire(&weak, &tenant, at, epoch).await;
        })
    }

    /// Spawn the tenant's standing daily-reset loop.
    ///
    /// The first delay is computed from the caller-supplied `now` so the
    /// job stays deterministic under an injected instant; steady-state
    /// iterations resolve each next 00:01 against the real local clock.
    fn spawn_reset_job(&self, tenant: &str, now: NaiveDateTime) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        let tenant = tenant.to_string();
        let first_delay = (reset::next_reset_naive(now) - now).to_std().unwrap_or_default();

        tokio::spawn(async move {
            let mut delay = first_delay;
            loop {
                tokio::time::sleep(delay).await;

                let Some(inner) = weak.upgrade() else {
                    break;
                };
                let engine = SchedulerEngine { inner };
                engine
                    .daily_reset(&tenant, Local::now().naive_local())
                    .await;

                let real_now = Local::now();
                let Some(next) = reset::next_reset_after(real_now) else {
                    break;
                };
                delay = (next - real_now).to_std().unwrap_or_default();
            }
        })
    }
}

impl EngineInner {
    /// Fire path, entered when an armed timer elapses.
    ///
    /// The trigger entry is claimed under the tenant lock together with an
    /// epoch check, so a fire racing disable/daily_reset resolves to at
    /// most one of {fire, cancel} taking effect; a fire that loses is
    /// silently dropped. A claimed fire hands the merged reminder to the
    /// notifier collaborator; delivery errors are logged, never retried.
    async fn fire(weak: &Weak<EngineInner>, tenant: &str, at: NaiveDateTime, epoch: u64) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let sched = { inner.tenants.lock().unwrap().get(tenant).cloned() };
        let Some(sched) = sched else {
            return;
        };

        let claimed = {
            let mut guard = sched.lock().await;
            if guard.epoch != epoch {
                None
            } else {
                guard.triggers.remove(&at)
            }
        };
        let Some(trigger) = claimed else {
            debug!(tenant, trigger_at = %at, "stale trigger dropped");
            return;
        };

        let reminder = Reminder {
            tenant: tenant.to_string(),
            trigger_at: at,
            starts_at: at + inner.lead,
            activities: trigger.names,
        };
        if let Err(e) = inner.notifier.notify(&reminder).await {
            warn!(tenant, error = %e, "reminder delivery failed");
        }
    }
}
