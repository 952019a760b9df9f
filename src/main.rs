use anyhow::Context;
use clap::{Parser, Subcommand};
use netscore_core::config::Config;
use netscore_core::{pipeline, predicates, BatchSummary, Engine};
use netscore_feeds::RowSource;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "netscore", about = "Normalize and score network log rows")]
struct Cli {
    /// Extra config file layered over ~/.config/netscore/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still wins).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score JSON-lines rows and print one scored record per line.
    Score {
        /// Input file; stdin when omitted.
        #[arg(long, short)]
        input: Option<PathBuf>,
        /// Worker tasks (overrides pipeline.workers).
        #[arg(long, short)]
        workers: Option<usize>,
        /// Print records in input order instead of completion order.
        #[arg(long)]
        ordered: bool,
    },
    /// Check an address: IPv4 validity and private-range membership.
    Ip { addr: String },
    /// Resolve a time range token (1h, 6h, 24h, 7d, 30d).
    Range { token: String },
    /// Print the host of a URL.
    Domain { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    let level = if cli.debug { "debug" } else { config.log.level.as_str() };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    match cli.command {
        Command::Score {
            input,
            workers,
            ordered,
        } => score(&config, input, workers, ordered).await,
        Command::Ip { addr } => {
            let out = serde_json::json!({
                "address": addr,
                "valid": predicates::is_valid_ip(&addr),
                "private": predicates::is_private_ip(&addr),
            });
            println!("{out}");
            Ok(())
        }
        Command::Range { token } => {
            let range = predicates::time_range(&token);
            println!("{}", serde_json::to_string(&range)?);
            Ok(())
        }
        Command::Domain { url } => {
            let host = predicates::extract_domain(&url)
                .with_context(|| format!("not a well-formed URL: {url}"))?;
            println!("{host}");
            Ok(())
        }
    }
}

async fn score(
    config: &Config,
    input: Option<PathBuf>,
    workers: Option<usize>,
    ordered: bool,
) -> anyhow::Result<()> {
    let engine = Arc::new(Engine::from_config(config)?);
    tracing::debug!(rules = ?engine.scorer().rules().collect::<Vec<_>>(), "scorer ready");
    let source = input.map_or(RowSource::Stdin, RowSource::File);
    let capacity = config.pipeline.channel_capacity;
    let workers = workers.unwrap_or(config.pipeline.workers);

    let (rows, feed) = netscore_feeds::spawn(source, capacity);
    let mut outcomes = pipeline::run(engine, rows, workers, capacity);

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    let mut summary = BatchSummary::default();

    let mut emit = |outcome: pipeline::Outcome| -> anyhow::Result<()> {
        summary.record(&outcome);
        match outcome.result {
            Ok(record) => {
                serde_json::to_writer(&mut out, &record)?;
                out.write_all(b"\n")?;
            }
            Err(err) => tracing::warn!(row = outcome.index, %err, "row rejected"),
        }
        Ok(())
    };

    if ordered {
        for outcome in pipeline::collect_ordered(outcomes).await {
            emit(outcome)?;
        }
    } else {
        while let Some(outcome) = outcomes.recv().await {
            emit(outcome)?;
        }
    }
    drop(emit);
    out.flush()?;

    let stats = feed.await.context("feed task panicked")??;
    tracing::info!(
        scored = summary.scored,
        rejected = summary.rejected,
        skipped = stats.skipped,
        max_score = ?summary.max_score,
        flags = ?summary.flags,
        "done"
    );
    Ok(())
}
