//! netscore-feeds: row sources for netscore.
//!
//! Each source reads JSON-lines (one object per line), decodes every line
//! into a [`netscore_core::RawRow`] and pushes it onto an async channel for
//! the pipeline. Lines that are not JSON objects are skipped with a warning:
//! one bad line never stops the feed. Only I/O failures end it early.

pub mod jsonl;

use netscore_core::RawRow;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: expected a JSON object")]
    NotAnObject { line: usize },
}

/// Where rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSource {
    File(PathBuf),
    Stdin,
}

impl std::fmt::Display for RowSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowSource::File(path) => write!(f, "{}", path.display()),
            RowSource::Stdin => write!(f, "stdin"),
        }
    }
}

/// What a finished feed delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub rows: usize,
    pub skipped: usize,
}

/// Start reading `source` on a background task.
///
/// The task ends when the source is exhausted or the receiver is dropped.
pub fn spawn(
    source: RowSource,
    capacity: usize,
) -> (mpsc::Receiver<RawRow>, JoinHandle<Result<FeedStats, FeedError>>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(async move {
        let stats = match &source {
            RowSource::File(path) => {
                let file = tokio::fs::File::open(path).await?;
                pump(BufReader::new(file), &tx).await?
            }
            RowSource::Stdin => pump(BufReader::new(tokio::io::stdin()), &tx).await?,
        };
        tracing::info!(%source, rows = stats.rows, skipped = stats.skipped, "feed finished");
        Ok::<_, FeedError>(stats)
    });
    (rx, handle)
}

/// Read every row from `source` into memory.
pub async fn read_rows(source: &RowSource) -> Result<Vec<RawRow>, FeedError> {
    let (mut rx, handle) = spawn(source.clone(), 1024);
    let mut rows = Vec::new();
    while let Some(row) = rx.recv().await {
        rows.push(row);
    }
    handle
        .await
        .map_err(|e| FeedError::Io(std::io::Error::other(e)))??;
    Ok(rows)
}

/// Decode lines from `reader` and send them on `tx`.
pub async fn pump<R>(reader: R, tx: &mpsc::Sender<RawRow>) -> Result<FeedStats, FeedError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = FeedStats::default();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        match jsonl::decode_line(line_no, &line) {
            Ok(Some(row)) => {
                if tx.send(row).await.is_err() {
                    tracing::debug!(line = line_no, "receiver dropped, stopping feed");
                    break;
                }
                stats.rows += 1;
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%err, "skipping row");
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}
