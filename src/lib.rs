//! netscore: network log normalization and suspicion scoring.
//!
//! Facade over the workspace crates so integration tests and the binary can
//! import one path.
//!
//! # Architecture
//!
//! ```text
//! Feed (file / stdin) ──► Engine workers ──► scored JSON lines
//!                              │
//!                              └──► rejected rows (logged, counted)
//! ```
//!
//! Rows travel over `tokio` channels; each record is normalized, validated,
//! enriched and scored independently.

pub use netscore_core::*;
pub use netscore_feeds as feeds;
