//! reminder-worker — long-running reminder service.
//!
//! Loads the activity definitions, reopens the tenant state store, resumes
//! every previously-enabled tenant, and keeps their reminder triggers armed
//! until shutdown.

use std::path::Path;
use std::sync::Arc;

use chrono::{Duration, Local};
use clap::Parser;
use tracing::{info, warn};

use gameday_core::Config;
use gameday_notify::{Dispatcher, Notifier, WebhookNotifier};
use gameday_scheduler::{SchedulerEngine, TenantStateStore};
use gameday_timeline::{load_activities, LoadStatus};

// ── CLI ─────────────────────────────────────────────────────────────

/// Gameday reminder worker — arms and delivers activity reminders.
#[derive(Parser, Debug)]
#[command(name = "reminder-worker", version, about)]
struct Cli {
    /// Path to the activity definitions JSON file.
    #[arg(long, env = "GAMEDAY_ACTIVITIES_FILE")]
    activities: Option<String>,

    /// Path to the persisted tenant-state JSON file.
    #[arg(long, env = "GAMEDAY_TENANTS_FILE")]
    tenants: Option<String>,

    /// Minutes before an activity start at which a reminder fires.
    #[arg(long, env = "GAMEDAY_LEAD_MINUTES")]
    lead_minutes: Option<i64>,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    gameday_core::config::load_dotenv();
    let cli = Cli::parse();
    let config = Config::from_env();

    let activities_file = cli
        .activities
        .unwrap_or_else(|| config.schedule.activities_file.clone());
    let tenants_file = cli
        .tenants
        .unwrap_or_else(|| config.store.tenants_file.clone());
    let lead_minutes = cli
        .lead_minutes
        .unwrap_or(config.schedule.lead_minutes)
        .max(0);

    let (activities, results) = load_activities(Path::new(&activities_file))?;
    let skipped = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Failed { .. }))
        .count();
    info!(
        path = %activities_file,
        loaded = activities.len(),
        skipped,
        "activity definitions loaded"
    );

    let store = Arc::new(TenantStateStore::open_or_default(Path::new(&tenants_file)));

    let mut channels: Vec<Box<dyn Notifier>> = Vec::new();
    match &config.notify.webhook_url {
        Some(url) => {
            let webhook =
                WebhookNotifier::new(url.clone(), config.notify.reminder_template.clone())?;
            channels.push(Box::new(webhook));
        }
        None => warn!("no webhook URL configured, reminders will not be delivered"),
    }
    let dispatcher = Arc::new(Dispatcher::with_defaults(channels));

    let engine = SchedulerEngine::new(
        Arc::new(activities),
        store,
        dispatcher,
        Duration::minutes(lead_minutes),
    );

    let resumed = engine.resume_all(Local::now().naive_local()).await;
    info!(resumed, lead_minutes, "reminder-worker started");

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    engine.shutdown().await;
    info!("reminder-worker exited cleanly");

    Ok(())
}
