//! Wedding countdown.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

/// Scroll offset (px) below which the top banner is always shown. Scrolling
/// further down hides it; scrolling up or holding still shows it again.
pub const BANNER_REVEAL_OFFSET_PX: f64 = 20.0;

/// Local date-times without an offset are read as Indian Standard Time.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Remaining time until the wedding, floor-decomposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountdownValue {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownValue {
    pub fn is_zero(&self) -> bool {
        *self == CountdownValue::default()
    }
}

/// Parses a countdown target. Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]`
/// and `YYYY-MM-DD`; the last two are taken in IST.
pub fn parse_target(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let ist = FixedOffset::east_opt(IST_OFFSET_SECS)?;
    let naive = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    ist.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Time left until `target`; all zero at or after the target, never negative.
pub fn remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> CountdownValue {
    let diff_ms = (target - now).num_milliseconds();
    if diff_ms <= 0 {
        return CountdownValue::default();
    }

    let total_secs = diff_ms / 1000;
    CountdownValue {
        days: total_secs / 86_400,
        hours: (total_secs / 3_600) % 24,
        minutes: (total_secs / 60) % 60,
        seconds: total_secs % 60,
    }
}

/// Marathi unit labels, in display order.
pub const COUNTDOWN_LABELS: [&str; 4] = ["दिवस", "तास", "मिनिटे", "सेकंद"];
