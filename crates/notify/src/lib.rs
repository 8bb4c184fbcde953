//! Outbound collaborator seams for reminder delivery.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable reminder delivery channels
//! - `TimelineRenderer` trait for the external picture-drawing collaborator
//! - Webhook notifier implementation (the reference delivery channel)
//! - Minijinja template rendering for reminder messages
//! - Dispatcher that fans a reminder out to configured channels

pub mod dispatcher;
pub mod templating;
pub mod traits;
pub mod webhook;

pub use dispatcher::Dispatcher;
pub use templating::format_reminder;
pub use traits::{Notifier, NotifyError, Reminder, TimelineRenderer};
pub use webhook::WebhookNotifier;
