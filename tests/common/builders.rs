//! Test builders: ergonomic constructors for raw rows and log entries.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::{DateTime, TimeZone, Utc};
use netscore::{Engine, HourBasis, LogEntry, RawRow, RawValue, Scorer};

// ---------------------------------------------------------------------------
// RowBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for raw input rows using the snake_case column spellings.
///
/// # Example
///
/// ```rust
/// let row = RowBuilder::flow("10.0.0.5", "203.0.113.9")
///     .dst_port(3389)
///     .action("deny")
///     .at_hour(3)
///     .build();
/// ```
pub struct RowBuilder {
    row: RawRow,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self { row: RawRow::new() }
    }

    /// A row with both identity fields and a mid-afternoon timestamp.
    pub fn flow(src: &str, dst: &str) -> Self {
        Self::new().src(src).dst(dst).at_hour(14)
    }

    pub fn set(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.row.insert(key, value);
        self
    }

    pub fn src(self, ip: &str) -> Self {
        self.set("source_ip", ip)
    }

    pub fn dst(self, ip: &str) -> Self {
        self.set("dest_ip", ip)
    }

    pub fn dst_port(self, port: i64) -> Self {
        self.set("dest_port", port)
    }

    pub fn protocol(self, protocol: &str) -> Self {
        self.set("protocol", protocol)
    }

    pub fn action(self, action: &str) -> Self {
        self.set("action", action)
    }

    pub fn bytes(self, bytes: i64) -> Self {
        self.set("bytes", bytes)
    }

    pub fn packets(self, packets: i64) -> Self {
        self.set("packets", packets)
    }

    /// `timestamp` column at `hour`:00 UTC on a fixed day.
    pub fn at_hour(self, hour: u32) -> Self {
        self.set("timestamp", at_hour(hour).to_rfc3339())
    }

    pub fn build(self) -> RawRow {
        self.row
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// 2024-01-15 at `hour`:00 UTC.
pub fn at_hour(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap()
}

/// An entry that triggers no heuristic: public-to-public, unprivileged
/// port, small transfer, daytime.
pub fn quiet_entry() -> LogEntry {
    LogEntry {
        timestamp: Some(at_hour(14)),
        source_ip: "198.51.100.7".to_string(),
        destination_ip: "203.0.113.9".to_string(),
        source_port: 49152,
        destination_port: 8080,
        bytes: 1000,
        packets: 10,
        ..LogEntry::default()
    }
}

pub fn utc_engine() -> Engine {
    Engine::new(HourBasis::Utc)
}

pub fn utc_scorer() -> Scorer {
    Scorer::new(HourBasis::Utc)
}
