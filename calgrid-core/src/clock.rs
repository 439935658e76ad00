//! Wall-clock time strings.
//!
//! Events store times as `"HH:MM AM/PM"`; the edit form works in 24-hour
//! `"HH:MM"`. These helpers convert between the two and never fail: input
//! that can't be understood converts to an empty string.

use chrono::{NaiveTime, Timelike};

const FORMAT_24H: &str = "%H:%M";
const FORMAT_AM_PM: &str = "%I:%M %p";

/// True for exactly `HH:MM` (two digits each) naming a real time of day.
pub fn is_hh_mm(time: &str) -> bool {
    let bytes = time.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[3..].iter().all(u8::is_ascii_digit)
        && NaiveTime::parse_from_str(time, FORMAT_24H).is_ok()
}

/// `H:MM` with a single-digit hour, e.g. `"9:30"`.
fn is_h_mm(time: &str) -> bool {
    time.len() == 4 && is_hh_mm(&format!("0{}", time))
}

/// Parse either storage form (`"02:30 PM"`) or form input (`"14:30"`).
pub fn parse(time: &str) -> Option<NaiveTime> {
    let time = time.trim();
    if time.is_empty() {
        return None;
    }
    if is_hh_mm(time) {
        return NaiveTime::parse_from_str(time, FORMAT_24H).ok();
    }
    NaiveTime::parse_from_str(&time.to_uppercase(), FORMAT_AM_PM).ok()
}

/// Minutes since midnight, used for ordering and range checks.
pub fn minutes_since_midnight(time: &str) -> Option<u32> {
    parse(time).map(|t| t.hour() * 60 + t.minute())
}

/// `"02:30 PM"` -> `"14:30"`. 24-hour input passes through unchanged,
/// with a single-digit hour padded (`"9:30"` -> `"09:30"`).
pub fn to_24_hour(time: &str) -> String {
    if is_hh_mm(time) {
        return time.to_string();
    }
    if is_h_mm(time) {
        return format!("0{}", time);
    }
    parse(time)
        .map(|t| t.format(FORMAT_24H).to_string())
        .unwrap_or_default()
}

/// `"14:30"` -> `"02:30 PM"`. Input already carrying AM/PM passes through.
pub fn to_am_pm(time: &str) -> String {
    if time.contains("AM") || time.contains("PM") {
        return time.to_string();
    }
    if !is_hh_mm(time) {
        return String::new();
    }
    parse(time)
        .map(|t| t.format(FORMAT_AM_PM).to_string())
        .unwrap_or_default()
}
