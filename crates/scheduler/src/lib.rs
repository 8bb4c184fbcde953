//! Per-tenant reminder scheduling engine.
//!
//! This crate provides:
//! - `SchedulerEngine` — owns every tenant's armed reminder triggers,
//!   translates trigger plans into cancellable tokio timer tasks, and
//!   exposes enable/disable/daily-reset operations with idempotency and
//!   cleanup guarantees
//! - `TenantStateStore` — durable tenant → enabled mapping, consulted at
//!   startup to resume previously-enabled tenants
//! - the standing 00:01 daily-reset schedule
//! - the `reminder-worker` binary wiring everything together
//!
//! Operations on one tenant are serialized through a per-tenant async
//! mutex; different tenants never contend on a shared lock across awaits.

pub mod engine;
pub mod error;
pub mod reset;
mod schedule;
pub mod store;


pub use engine::{EnableReport, SchedulerEngine};
pub use error::SchedulerError;
pub use store::{StoreError, TenantStateStore};
