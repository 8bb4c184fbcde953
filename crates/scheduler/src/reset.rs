//! The standing daily-reset schedule.
//!
//! Every enabled tenant carries one recurring job fixed at 00:01 local
//! time that replaces the previous day's triggers with a fresh plan. The
//! `cron` crate requires 6-field expressions (seconds first).

use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime};
use cron::Schedule;

/// 00:01 every day, 6-field form.
pub const DAILY_RESET_CRON: &str = "0 1 0 * * *";

/// The next 00:01 strictly after `now`.
pub fn next_reset_after(now: DateTime<Local>) -> Option<DateTime<Local>> {
    let schedule = Schedule::from_str(DAILY_RESET_CRON).ok()?;
    schedule.after(&now).next()
}

/// Naive wall-clock variant, used for the first delay after arming so the
/// engine stays deterministic under an injected `now`. Steady-state
/// iterations use [`next_reset_after`], which handles DST via the local
/// timezone.
pub fn next_reset_naive(now: NaiveDateTime) -> NaiveDateTime {
    let today_reset = now.date().and_hms_opt(0, 1, 0).expect("00:01 is valid");
    if now < today_reset {
        today_reset
    } else {
        today_reset + chrono::Duration::days(1)
    }
}
