//! Validator: the single fatal check in the pipeline.

use crate::error::{EngineError, Result};
use crate::types::LogEntry;

/// Reject entries without both identity fields. `sourceIP` is checked first.
pub fn validate(entry: &LogEntry) -> Result<()> {
    if entry.source_ip.is_empty() {
        return Err(EngineError::MissingRequiredField { field: "sourceIP" });
    }
    if entry.destination_ip.is_empty() {
        return Err(EngineError::MissingRequiredField {
            field: "destinationIP",
        });
    }
    Ok(())
}
