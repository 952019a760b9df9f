//! Static row corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of JSON objects, one per row,
//! mirroring what the feeds crate hands to the engine. Column spellings vary
//! deliberately: every alias the normalizer knows appears at least once.

use netscore::RawRow;

/// Rows from three different exporters, all valid.
pub const CORPUS_FIREWALL: &[&str] = &[
    // snake_case exporter
    r#"{"timestamp":"2024-01-15T14:00:00Z","source_ip":"198.51.100.7","dest_ip":"203.0.113.9","source_port":"50000","dest_port":"3389","protocol":"tcp","action":"allow","bytes":"1000","packets":"10"}"#,
    // abbreviated exporter with numeric cells
    r#"{"time":"2024-01-15 03:00:00","src_ip":"198.51.100.8","dst_ip":"203.0.113.10","src_port":40000,"dst_port":8080,"action":"DENY","size":500,"count":5}"#,
    // camelCase exporter with geo columns
    r#"{"date":"2024-01-15T12:30:00Z","sourceIP":"10.1.2.3","destinationIP":"93.184.216.34","sourcePort":51000,"destinationPort":443,"protocol":"TCP","bytes":157286400,"packets":5000,"country":"US","city":"Los Angeles","latitude":"34.05","longitude":"-118.24"}"#,
    // flood shape, UDP
    r#"{"timestamp":"2024-01-15T10:00:00Z","src_ip":"203.0.113.50","dst_ip":"198.51.100.1","dst_port":53,"protocol":"udp","bytes":5000,"packets":5000}"#,
];

/// Rows the validator must reject.
pub const CORPUS_INVALID: &[&str] = &[
    r#"{"timestamp":"2024-01-15T14:00:00Z","dst_ip":"203.0.113.9"}"#,
    r#"{"timestamp":"2024-01-15T14:00:00Z","src_ip":"198.51.100.7"}"#,
    r#"{"source_ip":"","dest_ip":"   "}"#,
    r#"{"protocol":"tcp","action":"deny","bytes":99999999999}"#,
];

/// Decode a corpus into rows.
pub fn rows(corpus: &[&str]) -> Vec<RawRow> {
    corpus
        .iter()
        .map(|line| serde_json::from_str(line).expect("fixture rows are JSON objects"))
        .collect()
}

/// `n` synthetic rows; every tenth lacks a destination, every seventh hits
/// RDP.
pub fn corpus_high_volume(n: usize) -> Vec<RawRow> {
    (0..n)
        .map(|i| {
            let mut row = RawRow::new()
                .with("timestamp", format!("2024-01-15T{:02}:{:02}:00Z", i % 24, i % 60))
                .with("src_ip", format!("10.0.{}.{}", i / 256 % 256, i % 256))
                .with("dst_port", if i % 7 == 0 { 3389i64 } else { 8443 })
                .with("bytes", (i as i64) * 100)
                .with("packets", (i as i64 % 50) + 1);
            if i % 10 != 0 {
                row.insert("dst_ip", format!("203.0.113.{}", i % 256));
            }
            row
        })
        .collect()
}
