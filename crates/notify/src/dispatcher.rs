//! Fans reminders out to configured delivery channels.
//!
//! The dispatcher receives a fired reminder and delivers it to all channels
//! configured for the tenant. Individual channel failures don't block other
//! channels, and the scheduler never retries a delivery.

use std::collections::HashMap;

use crate::traits::{DispatchResult, Notifier, NotifyError, Reminder};

/// Dispatches reminders to multiple channels, organized per tenant.
pub struct Dispatcher {
    /// Tenant id → channels dedicated to that tenant.
    tenant_channels: HashMap<String, Vec<Box<dyn Notifier>>>,
    /// Fallback channels used when no tenant-specific channels exist.
    default_channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    /// Create an empty dispatcher (no channels; deliveries are dropped
    /// with a debug log).
    pub fn empty() -> Self {
        Self {
            tenant_channels: HashMap::new(),
            default_channels: Vec::new(),
        }
    }

    /// Create a dispatcher with channels shared across all tenants.
    pub fn with_defaults(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self {
            tenant_channels: HashMap::new(),
            default_channels: channels,
        }
    }

    /// Replace all channels for a specific tenant.
    pub fn set_tenant_channels(&mut self, tenant: String, channels: Vec<Box<dyn Notifier>>) {
        self.tenant_channels.insert(tenant, channels);
    }

    /// Remove a tenant's dedicated channels (falls back to defaults).
    pub fn remove_tenant(&mut self, tenant: &str) {
        self.tenant_channels.remove(tenant);
    }

    /// Deliver a reminder to every channel configured for its tenant.
    ///
    /// Returns results for each channel delivery. Individual failures
    /// don't block other channels.
    pub async fn dispatch(&self, reminder: &Reminder) -> Vec<DispatchResult> {
        let channels = self
            .tenant_channels
            .get(&reminder.tenant)
            .unwrap_or(&self.default_channels);

        if channels.is_empty() {
            tracing::debug!(tenant = %reminder.tenant, "no delivery channels configured");
            return Vec::new();
        }

        let mut results = Vec::with_capacity(channels.len());

        for channel in channels {
            let start = std::time::Instant::now();
            let result = channel.notify(reminder).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let (success, error) = match result {
                Ok(()) => {
                    tracing::info!(
                        tenant = %reminder.tenant,
                        channel = channel.channel_name(),
                        activities = ?reminder.activities,
                        duration_ms,
                        "reminder delivered"
                    );
                    (true, None)
                }
                Err(e) => {
                    tracing::warn!(
                        tenant = %reminder.tenant,
                        channel = channel.channel_name(),
                        error = %e,
                        duration_ms,
                        "reminder delivery failed"
                    );
                    (false, Some(e.to_string()))
                }
            };

            results.push(DispatchResult {
                channel: channel.channel_name().to_string(),
                tenant: reminder.tenant.clone(),
                success,
                error,
                duration_ms,
            });
        }

        results
    }
}

#[async_trait::async_trait]
impl Notifier for Dispatcher {
    /// Fan out to all configured channels. Per-channel failures are logged
    /// by [`dispatch`](Dispatcher::dispatch); the fan-out itself succeeds.
    async fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError> {
        self.dispatch(reminder).await;
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "dispatcher"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::NaiveDate;

    struct MockNotifier {
        name: String,
        send_count: Arc<AtomicUsize>,
        should_fail: bool,
    }

    #[async_trait::async_trait]
    impl Notifier for MockNotifier {
        async fn notify(&self, _reminder: &Reminder) -> Result<(), NotifyError> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(NotifyError::Config("mock failure".to_string()))
            } else {
                Ok(())
            }
        }
        fn channel_name(&self) -> &str {
            &self.name
        }
    }

    fn mock(name: &str, count: Arc<AtomicUsize>, should_fail: bool) -> Box<dyn Notifier> {
        Box::new(MockNotifier {
            name: name.to_string(),
            send_count: count,
            should_fail,
        })
    }

    fn reminder(tenant: &str) -> Reminder {
        let start = NaiveDate::from_ymd_opt(2026, 2, 20)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Reminder {
            tenant: tenant.to_string(),
            trigger_at: start - chrono::Duration::minutes(10),
            starts_at: start,
            activities: vec!["A".to_string()],
        }
    }

    #[tokio::test]
    async fn dispatch_to_all_tenant_channels() {
        let count_a = Arc::new(AtomicUsize::new(0));
        let count_b = Arc::new(AtomicUsize::new(0));

        let mut dispatcher = Dispatcher::empty();
        dispatcher.set_tenant_channels(
            "g1".to_string(),
            vec![mock("a", count_a.clone(), false), mock("b", count_b.clone(), false)],
        );

        let results = dispatcher.dispatch(&reminder("g1")).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn partial_failure_doesnt_block() {
        let count = Arc::new(AtomicUsize::new(0));

        let mut dispatcher = Dispatcher::empty();
        dispatcher.set_tenant_channels(
            "g1".to_string(),
            vec![
                mock("fail", Arc::new(AtomicUsize::new(0)), true),
                mock("ok", count.clone(), false),
            ],
        );

        let results = dispatcher.dispatch(&reminder("g1")).await;
        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert!(results[1].success);
        assert_eq!(count.load(Ordering::SeqCst), 1); // second channel still sent
    }

    #[tokio::test]
    async fn unknown_tenant_uses_defaults() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::with_defaults(vec![mock("default", count.clone(), false)]);

        let results = dispatcher.dispatch(&reminder("unconfigured")).await;
        assert_eq!(results.len(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_channels_returns_empty() {
        let dispatcher = Dispatcher::empty();
        let results = dispatcher.dispatch(&reminder("g1")).await;
        assert!(results.is_empty());
    }
}
