//! Normalizer: maps an arbitrarily-keyed [`RawRow`] onto the canonical
//! [`LogEntry`](crate::LogEntry).
//!
//! Every canonical field has an ordered alias list; the first present alias
//! wins. Values that fail to parse fall back to the field default and are
//! reported at `trace` level, never as errors. Identity checks belong to the
//! validator, geo data to the geo enricher.

use crate::row::{RawRow, RawValue};
use crate::types::{HourBasis, LogEntry};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const DEFAULT_PROTOCOL: &str = "TCP";
pub const DEFAULT_ACTION: &str = "ALLOW";
pub const DEFAULT_BYTES: u64 = 0;
pub const DEFAULT_PACKETS: u64 = 1;

// ---------------------------------------------------------------------------
// Alias lists
// ---------------------------------------------------------------------------

pub const TIMESTAMP_ALIASES: &[&str] = &["timestamp", "time", "date"];
pub const SOURCE_IP_ALIASES: &[&str] = &["source_ip", "src_ip", "sourceIP"];
pub const DESTINATION_IP_ALIASES: &[&str] = &["dest_ip", "dst_ip", "destinationIP"];
pub const SOURCE_PORT_ALIASES: &[&str] = &["source_port", "src_port", "sourcePort"];
pub const DESTINATION_PORT_ALIASES: &[&str] = &["dest_port", "dst_port", "destinationPort"];
pub const PROTOCOL_ALIASES: &[&str] = &["protocol"];
pub const ACTION_ALIASES: &[&str] = &["action"];
pub const BYTES_ALIASES: &[&str] = &["bytes", "size"];
pub const PACKETS_ALIASES: &[&str] = &["packets", "count"];

/// All-digit text shorter than this is not read as epoch millis; `"2024"` is
/// a year, not two seconds past the epoch.
const MIN_EPOCH_MILLIS_DIGITS: usize = 10;

/// Zone-less layouts tried after RFC 3339 / RFC 2822.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// Normalizer bound to the zone used for zone-less timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    basis: HourBasis,
}

impl Normalizer {
    pub fn new(basis: HourBasis) -> Self {
        Self { basis }
    }

    pub fn normalize(&self, row: &RawRow) -> LogEntry {
        normalize(row, self.basis)
    }
}

/// Build a [`LogEntry`] from `row`. Never fails; missing identity fields are
/// left empty for the validator to reject.
pub fn normalize(row: &RawRow, basis: HourBasis) -> LogEntry {
    LogEntry {
        timestamp: row
            .first_present(TIMESTAMP_ALIASES)
            .and_then(|value| lenient("timestamp", value, parse_timestamp(value, basis))),
        source_ip: text_field(row, SOURCE_IP_ALIASES).unwrap_or_default(),
        destination_ip: text_field(row, DESTINATION_IP_ALIASES).unwrap_or_default(),
        source_port: port_field(row, "sourcePort", SOURCE_PORT_ALIASES),
        destination_port: port_field(row, "destinationPort", DESTINATION_PORT_ALIASES),
        protocol: token_field(row, PROTOCOL_ALIASES, DEFAULT_PROTOCOL),
        action: token_field(row, ACTION_ALIASES, DEFAULT_ACTION),
        bytes: count_field(row, "bytes", BYTES_ALIASES, DEFAULT_BYTES),
        packets: count_field(row, "packets", PACKETS_ALIASES, DEFAULT_PACKETS),
        flags: Vec::new(),
        geo_location: None,
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn text_field(row: &RawRow, aliases: &[&str]) -> Option<String> {
    row.first_present(aliases).and_then(RawValue::as_text)
}

fn token_field(row: &RawRow, aliases: &[&str], default: &str) -> String {
    text_field(row, aliases)
        .map(|s| s.to_uppercase())
        .unwrap_or_else(|| default.to_string())
}

fn port_field(row: &RawRow, field: &'static str, aliases: &[&str]) -> u16 {
    row.first_present(aliases)
        .and_then(|value| {
            let port = parse_count(value).and_then(|n| u16::try_from(n).ok());
            lenient(field, value, port)
        })
        .unwrap_or(0)
}

fn count_field(row: &RawRow, field: &'static str, aliases: &[&str], default: u64) -> u64 {
    row.first_present(aliases)
        .and_then(|value| lenient(field, value, parse_count(value)))
        .unwrap_or(default)
}

/// Pass `parsed` through, tracing the fallback when a present value did not
/// parse.
fn lenient<T>(field: &'static str, value: &RawValue, parsed: Option<T>) -> Option<T> {
    if parsed.is_none() {
        tracing::trace!(field, value = ?value, "malformed value, using default");
    }
    parsed
}

/// Non-negative integer from a cell. Fractions are truncated; negatives,
/// non-finite numbers and non-numeric text yield `None`.
pub fn parse_count(value: &RawValue) -> Option<u64> {
    let from_float = |n: f64| (n.is_finite() && n >= 0.0 && n < u64::MAX as f64).then(|| n.trunc() as u64);
    match value {
        RawValue::Number(n) => from_float(*n),
        RawValue::Text(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_float))
        }
        RawValue::Absent => None,
    }
}

/// Parse a timestamp cell.
///
/// Numbers and all-digit strings of at least ten digits are Unix epoch
/// milliseconds. Text is tried
/// as RFC 3339, RFC 2822, then the zone-less layouts (read in `basis`), then
/// a bare `YYYY-MM-DD` at midnight.
pub fn parse_timestamp(value: &RawValue, basis: HourBasis) -> Option<DateTime<Utc>> {
    match value {
        RawValue::Number(n) if n.is_finite() => DateTime::from_timestamp_millis(n.trunc() as i64),
        RawValue::Number(_) | RawValue::Absent => None,
        RawValue::Text(s) => parse_timestamp_text(s.trim(), basis),
    }
}

fn parse_timestamp_text(s: &str, basis: HourBasis) -> Option<DateTime<Utc>> {
    if s.len() >= MIN_EPOCH_MILLIS_DIGITS && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .and_then(|naive| basis.resolve_naive(&naive))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
