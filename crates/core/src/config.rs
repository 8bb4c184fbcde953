use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_i64(key: &str, default: i64) -> i64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub schedule: ScheduleConfig,
    pub store: StoreConfig,
    pub notify: NotifyConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            schedule: ScheduleConfig::from_env(),
            store: StoreConfig::from_env(),
            notify: NotifyConfig::from_env(),
        }
    }
}

// ── Schedule ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Path to the activity definitions JSON file.
    pub activities_file: String,
    /// Minutes before an occurrence's start at which its reminder fires.
    pub lead_minutes: i64,
}

impl ScheduleConfig {
    pub fn from_env() -> Self {
        Self {
            activities_file: env_or("GAMEDAY_ACTIVITIES_FILE", "activities.json"),
            lead_minutes: env_i64("GAMEDAY_LEAD_MINUTES", 10).max(0),
        }
    }
}

// ── Store ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the persisted tenant-state JSON file.
    pub tenants_file: String,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self {
            tenants_file: env_or("GAMEDAY_TENANTS_FILE", "tenants.json"),
        }
    }
}

// ── Notify ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook URL for reminder delivery. None = no delivery channel.
    pub webhook_url: Option<String>,
    /// Optional minijinja template overriding the default reminder message.
    pub reminder_template: Option<String>,
}

impl NotifyConfig {
    pub fn from_env() -> Self {
        Self {
            webhook_url: env_opt("GAMEDAY_WEBHOOK_URL"),
            reminder_template: env_opt("GAMEDAY_REMINDER_TEMPLATE"),
        }
    }
}
