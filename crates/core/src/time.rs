//! The `--since`/`--until` timestamp grammar.
//!
//! Accepts an absolute unix timestamp (`1700000000`), a relative duration
//! counted back from now (`30s`, `1m`, `2h`, `7d`, `2w`, `3mo`, `1y`), or
//! the literal `now`. Everything resolves to absolute unix seconds at parse
//! time. Malformed values yield `None` and the grammar drops the flag.

use chrono::Utc;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 365 * DAY;

/// Current wall-clock time in unix seconds.
pub fn now_unix() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Parse a timestamp expression relative to `now`.
pub fn parse_timestamp(raw: &str, now: u64) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.eq_ignore_ascii_case("now") {
        return Some(now);
    }
    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.parse().ok();
    }
    parse_duration_secs(trimmed).map(|secs| now.saturating_sub(secs))
}

/// Parse a relative duration (`7d`, `3mo`, …) into seconds.
pub fn parse_duration_secs(raw: &str) -> Option<u64> {
    let digits_end = raw.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let (digits, unit) = raw.split_at(digits_end);
    let count: u64 = digits.parse().ok()?;
    let unit_secs = match unit.to_ascii_lowercase().as_str() {
        "s" => 1,
        "m" => MINUTE,
        "h" => HOUR,
        "d" => DAY,
        "w" => WEEK,
        "mo" => MONTH,
        "y" => YEAR,
        _ => return None,
    };
    count.checked_mul(unit_secs)
}
