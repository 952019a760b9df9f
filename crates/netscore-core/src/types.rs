//! Core types for netscore-core.
//!
//! This module defines the canonical record shape shared by every stage of
//! the engine: the normalised [`LogEntry`], its optional [`GeoLocation`], the
//! [`Flag`] tags attached by the scorer, and the [`ScoredRecord`] handed to
//! the reporting boundary.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A normalised network/call log record.
///
/// Built once per raw row by the normalizer. `flags` stays empty until the
/// scorer runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Event time. `None` when the row carried no parseable timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "sourceIP")]
    pub source_ip: String,
    #[serde(rename = "destinationIP")]
    pub destination_ip: String,
    pub source_port: u16,
    pub destination_port: u16,
    /// Upper-cased protocol token, `TCP` by default.
    pub protocol: String,
    /// Upper-cased firewall action, `ALLOW` by default.
    pub action: String,
    pub bytes: u64,
    pub packets: u64,
    pub flags: Vec<Flag>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub geo_location: Option<GeoLocation>,
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            timestamp: None,
            source_ip: String::new(),
            destination_ip: String::new(),
            source_port: 0,
            destination_port: 0,
            protocol: crate::normalizer::DEFAULT_PROTOCOL.to_string(),
            action: crate::normalizer::DEFAULT_ACTION.to_string(),
            bytes: 0,
            packets: 1,
            flags: Vec::new(),
            geo_location: None,
        }
    }
}

/// Location data attached when the raw row names a country or city.
///
/// Coordinates are `None` when missing or unparseable; `Some(0.0)` is a real
/// coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub country: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Tag naming a heuristic that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flag {
    SuspiciousPort,
    UnusualTime,
    LargeTransfer,
    HighFrequency,
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flag::SuspiciousPort => write!(f, "SUSPICIOUS_PORT"),
            Flag::UnusualTime => write!(f, "UNUSUAL_TIME"),
            Flag::LargeTransfer => write!(f, "LARGE_TRANSFER"),
            Flag::HighFrequency => write!(f, "HIGH_FREQUENCY"),
        }
    }
}

/// Identifies one scoring rule, flagged or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    SuspiciousPort,
    UnusualTime,
    LargeTransfer,
    BlockedAction,
    PrivilegedPort,
    PrivateEgress,
    HighFrequency,
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleId::SuspiciousPort => write!(f, "suspicious_port"),
            RuleId::UnusualTime => write!(f, "unusual_time"),
            RuleId::LargeTransfer => write!(f, "large_transfer"),
            RuleId::BlockedAction => write!(f, "blocked_action"),
            RuleId::PrivilegedPort => write!(f, "privileged_port"),
            RuleId::PrivateEgress => write!(f, "private_egress"),
            RuleId::HighFrequency => write!(f, "high_frequency"),
        }
    }
}

/// One triggered rule and what it added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub rule: RuleId,
    pub points: u8,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub flag: Option<Flag>,
}

/// A validated, scored record ready for the reporting boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub entry: LogEntry,
    /// Suspicion score in `0..=100`.
    pub score: u8,
    pub contributions: Vec<Contribution>,
}

/// Which clock the hour-of-day heuristic reads, and how zone-less
/// timestamps are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HourBasis {
    /// The host's local zone.
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl HourBasis {
    /// Hour of day (0–23) of `ts` in this basis.
    pub fn hour_of(&self, ts: &DateTime<Utc>) -> u32 {
        match self {
            HourBasis::Local => ts.with_timezone(&Local).hour(),
            HourBasis::Utc => ts.hour(),
            HourBasis::Fixed(offset) => ts.with_timezone(offset).hour(),
        }
    }

    /// Interpret a zone-less timestamp in this basis. Returns `None` for
    /// local times skipped by a DST transition.
    pub fn resolve_naive(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            HourBasis::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            HourBasis::Utc => Some(Utc.from_utc_datetime(naive)),
            HourBasis::Fixed(offset) => offset
                .from_local_datetime(naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Parse `local`, `utc`, or a `+HH:MM` / `-HH:MM` offset.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Some(HourBasis::Local),
            "utc" | "z" | "+00:00" => Some(HourBasis::Utc),
            other => parse_offset(other).map(HourBasis::Fixed),
        }
    }
}

impl std::fmt::Display for HourBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HourBasis::Local => write!(f, "local"),
            HourBasis::Utc => write!(f, "utc"),
            HourBasis::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
