//! JSON-lines decoding.

use crate::FeedError;
use netscore_core::RawRow;

/// Decode one line. Blank lines yield `Ok(None)`; `line` is 1-based and only
/// used for error messages.
pub fn decode_line(line: usize, text: &str) -> Result<Option<RawRow>, FeedError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|source| FeedError::Json { line, source })?;
    match value {
        serde_json::Value::Object(map) => Ok(Some(RawRow::from(map))),
        _ => Err(FeedError::NotAnObject { line }),
    }
}
