//! Domain-specific assertion macros for netscore harnesses.
//!
//! These wrap plain `assert!`/`pretty_assertions` checks and add failure
//! messages that say which engine invariant was violated.

use netscore::{Flag, ScoredRecord};

/// Assert a record's score and flag list in one go.
///
/// ```rust
/// assert_scored!(record, 45, [Flag::UnusualTime]);
/// ```
#[macro_export]
macro_rules! assert_scored {
    ($record:expr, $score:expr, [$($flag:expr),* $(,)?]) => {{
        let record: &netscore::ScoredRecord = &$record;
        let expected_flags: Vec<netscore::Flag> = vec![$($flag),*];
        if record.score != $score || record.entry.flags != expected_flags {
            panic!(
                "assert_scored! failed:\n  expected: score {} flags {:?}\n  actual:   score {} flags {:?}\n  contributions: {:?}",
                $score, expected_flags, record.score, record.entry.flags, record.contributions
            );
        }
    }};
}

/// Assert that an outcome was rejected for a missing field.
#[macro_export]
macro_rules! assert_rejected {
    ($outcome:expr, $field:expr) => {{
        match &$outcome.result {
            Err(netscore::EngineError::MissingRequiredField { field }) if *field == $field => {}
            other => panic!(
                "assert_rejected! failed: expected MissingRequiredField({:?}) for row {}, got {:?}",
                $field, $outcome.index, other
            ),
        }
    }};
}

// ---------------------------------------------------------------------------
// Record invariant helpers
// ---------------------------------------------------------------------------

/// Invariants every scored record must hold:
///
/// - identity fields are non-empty
/// - score is within `0..=100` and equals the clamped sum of contributions
/// - flags are exactly the contributions' flags, in order
pub fn assert_record_invariants(record: &ScoredRecord) {
    assert!(!record.entry.source_ip.is_empty(), "empty sourceIP: {record:?}");
    assert!(!record.entry.destination_ip.is_empty(), "empty destinationIP: {record:?}");
    assert!(record.score <= 100, "score out of range: {record:?}");

    let sum: u32 = record.contributions.iter().map(|c| u32::from(c.points)).sum();
    assert_eq!(u32::from(record.score), sum.min(100), "score/contribution mismatch: {record:?}");

    let flags: Vec<Flag> = record.contributions.iter().filter_map(|c| c.flag).collect();
    assert_eq!(record.entry.flags, flags, "flags/contribution mismatch: {record:?}");
}
