//! Notifier and renderer trait definitions and shared error types.

use chrono::NaiveDateTime;

use gameday_timeline::DaySnapshot;

/// Errors that can occur during reminder delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A reminder ready for delivery: the merged set of activities sharing one
/// trigger instant for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Reminder {
    /// Tenant (chat group) the reminder belongs to.
    pub tenant: String,
    /// The instant the reminder fired (occurrence start minus lead offset).
    pub trigger_at: NaiveDateTime,
    /// The shared start instant of the activities below.
    pub starts_at: NaiveDateTime,
    /// Activity names, in their planned order. Never empty.
    pub activities: Vec<String>,
}

impl Reminder {
    /// Minutes between the trigger instant and the occurrence start.
    pub fn lead_minutes(&self) -> i64 {
        (self.starts_at - self.trigger_at).num_minutes()
    }
}

/// Trait for reminder delivery channel implementations.
///
/// The scheduler engine depends only on this trait; concrete chat-platform
/// adapters live outside this repo.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a reminder through this channel.
    async fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "webhook").
    fn channel_name(&self) -> &str;
}

/// Trait for the external timeline-picture collaborator.
///
/// The core emits a structured [`DaySnapshot`]; the renderer turns it into
/// image bytes. An empty snapshot must be rendered as an explicit
/// "no activities today" placeholder, never treated as an error.
#[async_trait::async_trait]
pub trait TimelineRenderer: Send + Sync {
    async fn render(&self, snapshot: &DaySnapshot) -> Result<Vec<u8>, NotifyError>;
}

/// Result of dispatching a reminder to a single channel.
#[derive(Debug)]
pub struct DispatchResult {
    pub channel: String,
    pub tenant: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
