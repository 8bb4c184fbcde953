//! Minijinja template rendering for reminder messages.
//!
//! Templates are arbitrary strings (not pre-registered), so a fresh
//! [`minijinja::Environment`] is created per render call.

use crate::traits::{NotifyError, Reminder};

/// Default reminder message template: one line for a single activity, a
/// bulleted list when several activities share the trigger instant.
pub const DEFAULT_TEMPLATE: &str = "\
{%- if activities|length == 1 -%}
Reminder: {{ activities[0] }} starts at {{ starts_at }} (in {{ lead_minutes }} minutes).
{%- else -%}
Reminder: starting at {{ starts_at }} (in {{ lead_minutes }} minutes):
{% for a in activities %}- {{ a }}
{% endfor %}
{%- endif -%}";

/// Context data available to reminder templates.
#[derive(Debug, Clone, serde::Serialize)]
struct ReminderContext {
    /// Tenant the reminder is addressed to.
    tenant: String,
    /// Start time-of-day as "HH:MM".
    starts_at: String,
    /// Minutes until the activities start.
    lead_minutes: i64,
    /// Activity names in planned order.
    activities: Vec<String>,
}

impl ReminderContext {
    fn from_reminder(reminder: &Reminder) -> Self {
        Self {
            tenant: reminder.tenant.clone(),
            starts_at: reminder.starts_at.format("%H:%M").to_string(),
            lead_minutes: reminder.lead_minutes(),
            activities: reminder.activities.clone(),
        }
    }
}

/// Validate template syntax without rendering.
pub fn validate_template(template: &str) -> Result<(), NotifyError> {
    let mut env = minijinja::Environment::new();
    env.template_from_str(template)
        .map(|_| ())
        .map_err(|e| NotifyError::Template(e.to_string()))
}

/// Render the reminder message body.
///
/// `template` overrides [`DEFAULT_TEMPLATE`] when set.
pub fn format_reminder(reminder: &Reminder, template: Option<&str>) -> Result<String, NotifyError> {
    let env = minijinja::Environment::new();
    let ctx = ReminderContext::from_reminder(reminder);
    env.render_str(template.unwrap_or(DEFAULT_TEMPLATE), &ctx)
        .map_err(|e| NotifyError::Template(e.to_string()))
}
