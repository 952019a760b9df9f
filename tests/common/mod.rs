//! Shared test utilities for netscore integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Timestamps in fixtures are fixed UTC instants and every
//! engine built here reads hours in UTC, so results never depend on the host
//! zone.

#![allow(dead_code)]

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
