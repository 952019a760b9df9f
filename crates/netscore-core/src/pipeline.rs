//! Pipeline: raw row in, scored record (or per-record error) out.
//!
//! ```text
//! RawRow ──► normalize ──► validate ──► geo::enrich ──► Scorer ──► ScoredRecord
//!                             │
//!                             └──► EngineError (record skipped, batch continues)
//! ```
//!
//! [`Engine`] is stateless across records, so [`run`] can fan rows out to
//! any number of tokio workers and fan the outcomes back into one channel.

use crate::config::Config;
use crate::error::{ConfigError, EngineError};
use crate::normalizer::Normalizer;
use crate::row::RawRow;
use crate::scorer::Scorer;
use crate::types::{Flag, HourBasis, ScoredRecord};
use crate::{geo, validator};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Normalizer and scorer sharing one hour basis.
#[derive(Debug)]
pub struct Engine {
    normalizer: Normalizer,
    scorer: Scorer,
}

impl Engine {
    pub fn new(basis: HourBasis) -> Self {
        Self {
            normalizer: Normalizer::new(basis),
            scorer: Scorer::new(basis),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.scoring.hour_basis()?))
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Run one row through every stage.
    pub fn process(&self, row: &RawRow) -> Result<ScoredRecord, EngineError> {
        let mut entry = self.normalizer.normalize(row);
        validator::validate(&entry)?;
        entry.geo_location = geo::enrich(row);
        Ok(self.scorer.score(entry))
    }

    /// Process rows in order. A rejected row yields an `Err` outcome and the
    /// batch carries on.
    pub fn process_batch<'a, I>(&self, rows: I) -> Vec<Outcome>
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        let outcomes: Vec<Outcome> = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| self.outcome(index, row))
            .collect();
        let summary = BatchSummary::from_outcomes(&outcomes);
        tracing::info!(
            scored = summary.scored,
            rejected = summary.rejected,
            "batch processed"
        );
        outcomes
    }

    fn outcome(&self, index: usize, row: &RawRow) -> Outcome {
        let result = self.process(row);
        if let Err(err) = &result {
            tracing::debug!(index, %err, "record rejected");
        }
        Outcome { index, result }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(HourBasis::default())
    }
}

/// Result for the row at `index`: its 0-based position among the rows handed
/// to the engine, not a line number in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub index: usize,
    pub result: Result<ScoredRecord, EngineError>,
}

/// Counts over a set of outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub scored: usize,
    pub rejected: usize,
    pub flags: BTreeMap<Flag, usize>,
    /// Highest score seen, if anything was scored.
    pub max_score: Option<u8>,
}

impl BatchSummary {
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a Outcome>,
    {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    pub fn record(&mut self, outcome: &Outcome) {
        match &outcome.result {
            Ok(record) => {
                self.scored += 1;
                self.max_score = self.max_score.max(Some(record.score));
                for flag in &record.entry.flags {
                    *self.flags.entry(*flag).or_default() += 1;
                }
            }
            Err(_) => self.rejected += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.scored + self.rejected
    }
}

// ---------------------------------------------------------------------------
// Concurrent fan-out / fan-in
// ---------------------------------------------------------------------------

/// Spawn a dispatcher and `workers` worker tasks.
///
/// Rows received on `rows` are numbered in arrival order and handed out
/// round-robin. Outcomes arrive on the returned channel in completion order;
/// sort by [`Outcome::index`] to restore input order. The output closes once
/// `rows` is closed and every worker has drained. `workers` is clamped to at
/// least 1.
pub fn run(
    engine: Arc<Engine>,
    mut rows: mpsc::Receiver<RawRow>,
    workers: usize,
    capacity: usize,
) -> mpsc::Receiver<Outcome> {
    let workers = workers.max(1);
    let capacity = capacity.max(1);
    let (out_tx, out_rx) = mpsc::channel(capacity);

    let mut lanes = Vec::with_capacity(workers);
    let mut set = JoinSet::new();
    for worker in 0..workers {
        let (lane_tx, mut lane_rx) = mpsc::channel::<(usize, RawRow)>(capacity);
        lanes.push(lane_tx);
        let engine = Arc::clone(&engine);
        let out_tx = out_tx.clone();
        set.spawn(async move {
            let mut handled = 0usize;
            while let Some((index, row)) = lane_rx.recv().await {
                handled += 1;
                if out_tx.send(engine.outcome(index, &row)).await.is_err() {
                    tracing::debug!(worker, "output closed, worker stopping");
                    break;
                }
            }
            tracing::trace!(worker, handled, "worker drained");
        });
    }
    drop(out_tx);

    tokio::spawn(async move {
        let mut index = 0usize;
        while let Some(row) = rows.recv().await {
            let lane = &lanes[index % lanes.len()];
            if lane.send((index, row)).await.is_err() {
                break;
            }
            index += 1;
        }
        drop(lanes);
        while set.join_next().await.is_some() {}
        tracing::info!(rows = index, workers, "pipeline drained");
    });

    out_rx
}

/// Collect every outcome from [`run`] and return them in input order.
pub async fn collect_ordered(mut outcomes: mpsc::Receiver<Outcome>) -> Vec<Outcome> {
    let mut all = Vec::new();
    while let Some(outcome) = outcomes.recv().await {
        all.push(outcome);
    }
    all.sort_by_key(|o| o.index);
    all
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
