// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stream Trace
//!
//! Evaluates combinator expressions over the sample inputs and prints the
//! timed trace of every expression.
//!
//! Run with: cargo run --bin stream-trace -- "zip(input1, input2)" "input1.adjacentPairs()"
//!
//! Configuration:
//! - `CIM_STREAM_SPEED_FACTOR` / `--speed-factor` -- replay speed (default 10)
//! - `CIM_STREAM_REPORTING_FACTOR` / `--reporting-factor` -- reported time scale (default 10)
//! - `RUST_LOG` -- log filter (default info)

use anyhow::{Context, Result};
use cim_stream_combinators::samples::{sample_int, sample_string};
use cim_stream_combinators::{CombinatorTree, Engine, EngineConfig, EvaluationContext, Node};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_EXPRESSIONS: &[&str] = &[
    "input1",
    "input2",
    "merge(input1, input2)",
    "chain(input1, input2)",
    "zip(input1, input2)",
    "combineLatest(input1, input2)",
    "input1.adjacentPairs()",
];

#[derive(Debug, Parser)]
#[command(name = "stream-trace")]
#[command(about = "Trace stream combinators over timed sample inputs")]
struct Cli {
    /// Combinator expressions, e.g. "zip(input1, merge(input2, input1))"
    expressions: Vec<String>,

    /// Replay speed factor (overrides CIM_STREAM_SPEED_FACTOR)
    #[arg(long)]
    speed_factor: Option<f64>,

    /// Reporting factor (overrides CIM_STREAM_REPORTING_FACTOR)
    #[arg(long)]
    reporting_factor: Option<f64>,

    /// Print the evaluation report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env().context("Failed to load engine configuration")?;
    if let Some(speed_factor) = cli.speed_factor {
        config.speed_factor = speed_factor;
    }
    if let Some(reporting_factor) = cli.reporting_factor {
        config.reporting_factor = reporting_factor;
    }
    info!(
        "Speed factor {}, reporting factor {}",
        config.speed_factor, config.reporting_factor
    );

    let expressions: Vec<String> = if cli.expressions.is_empty() {
        DEFAULT_EXPRESSIONS.iter().map(|s| s.to_string()).collect()
    } else {
        cli.expressions
    };

    let nodes = expressions
        .iter()
        .map(|expr| {
            expr.parse::<CombinatorTree>()
                .map(Node::new)
                .with_context(|| format!("Invalid expression: {expr}"))
        })
        .collect::<Result<Vec<Node>>>()?;

    let engine = Engine::new(config).context("Invalid engine configuration")?;
    let ctx = EvaluationContext::from_config(sample_int(), sample_string(), engine.config())
        .context("Invalid sample inputs")?;

    let report = engine
        .run_all(&nodes, &ctx)
        .await
        .context("Evaluation failed")?;

    if cli.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    for node in &nodes {
        println!("{}", node.tree);
        for event in report.trace(&node.id).unwrap_or_default() {
            println!("  {event}");
        }
    }
    println!("duration: {:.3}", report.duration());

    Ok(())
}
