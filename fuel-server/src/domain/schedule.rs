//! Opening-hours heuristic over the free-text schedule field.
//!
//! Upstream schedules look like `"L-D: 24H"`, `"L-V: 06:00-22:00; S: 08:00-14:00"`
//! or anything else a station operator typed. Only the simplest shapes are
//! understood; everything unrecognised but served today counts as open.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use regex::Regex;

static TIME_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}):(\d{2})-(\d{2}):(\d{2})").expect("valid regex"));

/// Whether a station with this schedule is open at `now` (local time).
pub fn is_open_now(schedule: &str, now: NaiveDateTime) -> bool {
    let minutes = (now.hour() * 60 + now.minute()) as u16;
    is_open_at(schedule, now.weekday(), minutes)
}

/// Whether a station with this schedule is open on `weekday` at `minutes`
/// past midnight.
///
/// Rules, first match wins:
/// 1. empty schedule → open
/// 2. mentions "24" → open
/// 3. today not covered by `L-D`, `L-V` (Mon–Fri), `S` (Sat) or `D` (Sun) → closed
/// 4. first `HH:MM-HH:MM` range decides, bounds inclusive
/// 5. served today without a readable range → open
pub fn is_open_at(schedule: &str, weekday: Weekday, minutes: u16) -> bool {
    if schedule.is_empty() || schedule.contains("24") {
        return true;
    }

    let clean: String = schedule
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if !serves_day(&clean, weekday) {
        return false;
    }

    match first_time_range(&clean) {
        Some((open, close)) => open <= minutes && minutes <= close,
        None => true,
    }
}

fn serves_day(clean: &str, weekday: Weekday) -> bool {
    if clean.contains("L-D") || clean.contains("LUNES-DOMINGO") {
        return true;
    }
    match weekday {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri => {
            clean.contains("L-V")
        }
        Weekday::Sat => clean.contains('S'),
        Weekday::Sun => clean.contains('D'),
    }
}

/// Opening and closing minutes of the first `HH:MM-HH:MM` range.
fn first_time_range(clean: &str) -> Option<(u16, u16)> {
    let caps = TIME_RANGE_RE.captures(clean)?;
    let field = |i: usize| -> Option<u16> { caps.get(i)?.as_str().parse().ok() };

    let open = field(1)? * 60 + field(2)?;
    let close = field(3)? * 60 + field(4)?;
    Some((open, close))
}
