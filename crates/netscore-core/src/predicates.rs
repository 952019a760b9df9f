//! Utility predicates used by the scorer and by external callers.
//!
//! - [`is_private_ip`]: textual prefix match against the private, loopback
//!   and link-local IPv4 ranges.
//! - [`is_valid_ip`]: dotted-quad IPv4 literal check.
//! - [`resolve_time_range`]: symbolic window (`1h`, `7d`, …) to an interval.
//! - [`extract_domain`]: URL string to host.
//!
//! The address predicates are string patterns, not CIDR arithmetic:
//! `10.999.1.1` is "private" even though it is not a valid address.

use chrono::{DateTime, Duration, Utc};
use regex::{Regex, RegexSet};
use serde::Serialize;
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

static PRIVATE_PREFIXES: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"^10\.",
        r"^172\.(1[6-9]|2[0-9]|3[01])\.",
        r"^192\.168\.",
        r"^127\.",
        r"^169\.254\.",
    ])
    .expect("private prefix patterns are valid")
});

static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})$")
        .expect("dotted quad pattern is valid")
});

/// `10/8`, `172.16/12`, `192.168/16`, `127/8` or `169.254/16` by prefix.
pub fn is_private_ip(ip: &str) -> bool {
    PRIVATE_PREFIXES.is_match(ip)
}

/// Four dot-separated decimal groups, each in `0..=255`. Leading zeros are
/// accepted (`192.168.001.1` is valid).
pub fn is_valid_ip(ip: &str) -> bool {
    let Some(caps) = DOTTED_QUAD.captures(ip) else {
        return false;
    };
    caps.iter()
        .skip(1)
        .flatten()
        .all(|group| group.as_str().parse::<u16>().is_ok_and(|n| n <= 255))
}

// ---------------------------------------------------------------------------
// Time ranges
// ---------------------------------------------------------------------------

/// Symbolic look-back window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    OneHour,
    SixHours,
    #[default]
    OneDay,
    SevenDays,
    ThirtyDays,
}

impl TimeWindow {
    /// Unknown tokens fall back to the 24-hour window.
    pub fn parse_lenient(token: &str) -> Self {
        match token.trim() {
            "1h" => TimeWindow::OneHour,
            "6h" => TimeWindow::SixHours,
            "24h" => TimeWindow::OneDay,
            "7d" => TimeWindow::SevenDays,
            "30d" => TimeWindow::ThirtyDays,
            other => {
                tracing::debug!(token = other, "unknown time range, using 24h");
                TimeWindow::OneDay
            }
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            TimeWindow::OneHour => Duration::hours(1),
            TimeWindow::SixHours => Duration::hours(6),
            TimeWindow::OneDay => Duration::hours(24),
            TimeWindow::SevenDays => Duration::days(7),
            TimeWindow::ThirtyDays => Duration::days(30),
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeWindow::OneHour => write!(f, "1h"),
            TimeWindow::SixHours => write!(f, "6h"),
            TimeWindow::OneDay => write!(f, "24h"),
            TimeWindow::SevenDays => write!(f, "7d"),
            TimeWindow::ThirtyDays => write!(f, "30d"),
        }
    }
}

/// Closed interval ending at the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.start <= *ts && *ts <= self.end
    }
}

/// Resolve `token` to the interval ending at `now`.
pub fn resolve_time_range(token: &str, now: DateTime<Utc>) -> TimeRange {
    let window = TimeWindow::parse_lenient(token);
    TimeRange {
        start: now - window.duration(),
        end: now,
    }
}

/// [`resolve_time_range`] against the current wall clock.
pub fn time_range(token: &str) -> TimeRange {
    resolve_time_range(token, Utc::now())
}

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

/// Host of an absolute URL, lower-cased, without port or user info. `None`
/// when `url` is relative, has no host or does not parse. International
/// hosts come back in their ASCII (punycode) form.
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url.trim()).ok()?;
    let host = parsed
        .host_str()?
        .trim_start_matches('[')
        .trim_end_matches(']');
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
