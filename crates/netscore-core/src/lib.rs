//! netscore-core: normalization and suspicion scoring engine.
//!
//! Raw rows arrive with inconsistent column names; this crate maps them onto
//! one canonical [`LogEntry`], rejects records without both identity fields,
//! attaches optional geo data and scores each record with a fixed set of
//! independent heuristics.
//!
//! # Architecture
//!
//! ```text
//! RawRow ──► Normalizer ──► Validator ──► Geo ──► Scorer ──► ScoredRecord
//!                              │
//!                              └──► EngineError (per record)
//! ```
//!
//! Every stage is a pure per-record function. [`pipeline::run`] fans records
//! out over tokio tasks; nothing is shared between records.

pub mod config;
pub mod error;
pub mod geo;
pub mod normalizer;
pub mod pipeline;
pub mod predicates;
pub mod row;
pub mod scorer;
pub mod types;
pub mod validator;

pub use error::{ConfigError, EngineError};
pub use pipeline::{BatchSummary, Engine, Outcome};
pub use predicates::{extract_domain, is_private_ip, is_valid_ip, resolve_time_range, TimeRange};
pub use row::{RawRow, RawValue};
pub use scorer::{Assessment, Scorer};
pub use types::{Contribution, Flag, GeoLocation, HourBasis, LogEntry, RuleId, ScoredRecord};
