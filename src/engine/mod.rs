// Copyright (c) 2025 - Cowboy AI, Inc.
//! Combinator Evaluation Engine
//!
//! The engine interprets a `CombinatorTree` against an `EvaluationContext`.
//! Evaluation is recursive: every node becomes a live `EventSignal`, every
//! leaf a timed replay of its input, and every combinator a task selecting
//! across its already-running children.
//!
//! # Architecture
//!
//! ```text
//! CombinatorTree             Engine::evaluate               Engine::report
//! ──────────────             ────────────────               ──────────────
//!
//!   zip                      zip task ◄── replay(input1)    time stamped at
//!   ├── input1       ──>         ▲                   ──>    root emission:
//!   └── input2                   └────── replay(input2)     (now - origin) × k
//! ```
//!
//! All leaves of one evaluation share a single origin instant, so their
//! replays line up on one virtual timeline regardless of tree shape.
//! Events carry their logical instant between nodes, and combinators order
//! simultaneous events left first by it. The output order of a tree is
//! therefore the same on any runtime flavor and worker count.
//!
//! # Cancellation
//!
//! Signals own their producer tasks and combinator tasks own their child
//! signals. Dropping a root signal (or a `ReportedSignal`) aborts the whole
//! subtree, including pending replay timers.
//!
//! # Example
//!
//! ```rust,ignore
//! use cim_stream_combinators::{Engine, EngineConfig, EvaluationContext};
//! use cim_stream_combinators::frp::CombinatorTree;
//! use cim_stream_combinators::samples::{sample_int, sample_string};
//!
//! let engine = Engine::new(EngineConfig::default())?;
//! let ctx = EvaluationContext::from_config(sample_int(), sample_string(), engine.config())?;
//!
//! let tree: CombinatorTree = "zip(input1, input2)".parse()?;
//! let events = engine.run(&tree, &ctx).await;
//! ```

pub mod context;
pub mod report;

pub use context::EvaluationContext;
pub use report::{EvaluationReport, Node, NodeId, ReportedSignal};

use crate::config::EngineConfig;
use crate::errors::{StreamError, StreamResult};
use crate::frp::{combinators, Clock, CombinatorTree, Event, EventSignal, TokioClock};
use chrono::Utc;
use futures::StreamExt;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info};

/// Evaluates combinator trees over timed inputs
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl Engine {
    /// Create an engine on the Tokio clock
    pub fn new(config: EngineConfig) -> StreamResult<Self> {
        Self::with_clock(config, Arc::new(TokioClock))
    }

    /// Create an engine on a custom clock
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> StreamResult<Self> {
        config.validate()?;
        Ok(Self { config, clock })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Build the live output of `tree`
    ///
    /// Leaf replays are anchored at `origin`. Every node starts running
    /// immediately; events carry their producer's time, not a reported one.
    /// Simultaneous events from both children of a node come out left
    /// child first. Must be called from within a Tokio runtime.
    pub fn evaluate(
        &self,
        tree: &CombinatorTree,
        ctx: &EvaluationContext,
        origin: Instant,
    ) -> EventSignal {
        debug!("Evaluating {} node", tree.kind());

        match tree {
            CombinatorTree::Input(input) => ctx.timeline(*input).replay(
                Arc::clone(&self.clock),
                origin,
                ctx.speed_factor(),
            ),
            CombinatorTree::Merge(left, right) => combinators::merge(
                self.evaluate(left, ctx, origin),
                self.evaluate(right, ctx, origin),
            ),
            CombinatorTree::Chain(left, right) => combinators::chain(
                self.evaluate(left, ctx, origin),
                self.evaluate(right, ctx, origin),
            ),
            CombinatorTree::Zip(left, right) => combinators::zip(
                self.evaluate(left, ctx, origin),
                self.evaluate(right, ctx, origin),
            ),
            CombinatorTree::CombineLatest(left, right) => combinators::combine_latest(
                self.evaluate(left, ctx, origin),
                self.evaluate(right, ctx, origin),
            ),
            CombinatorTree::AdjacentPairs(source) => {
                combinators::adjacent_pairs(self.evaluate(source, ctx, origin))
            }
        }
    }

    /// Start evaluating `tree` now and report emission times
    pub fn report(&self, tree: &CombinatorTree, ctx: &EvaluationContext) -> ReportedSignal {
        self.report_from(tree, ctx, self.clock.now())
    }

    fn report_from(
        &self,
        tree: &CombinatorTree,
        ctx: &EvaluationContext,
        origin: Instant,
    ) -> ReportedSignal {
        ReportedSignal::new(
            self.evaluate(tree, ctx, origin),
            Arc::clone(&self.clock),
            origin,
            self.config.reporting_factor,
        )
    }

    /// Evaluate `tree` to completion and collect its reported events
    pub async fn run(&self, tree: &CombinatorTree, ctx: &EvaluationContext) -> Vec<Event> {
        self.report(tree, ctx).collect().await
    }

    /// Evaluate every node concurrently and key the traces by node id
    ///
    /// All nodes share one origin, so their traces are directly comparable.
    /// Fails with `DuplicateNode` before starting anything if an id repeats.
    pub async fn run_all(
        &self,
        nodes: &[Node],
        ctx: &EvaluationContext,
    ) -> StreamResult<EvaluationReport> {
        let mut seen = HashSet::with_capacity(nodes.len());
        if let Some(duplicate) = nodes.iter().find(|node| !seen.insert(node.id)) {
            return Err(StreamError::DuplicateNode(duplicate.id));
        }

        info!("Evaluating {} nodes", nodes.len());
        let started_at = Utc::now();
        let origin = self.clock.now();

        let mut tasks = JoinSet::new();
        for node in nodes {
            debug!("Node {}: {} (depth {})", node.id, node.tree, node.tree.depth());
            let id = node.id;
            let signal = self.report_from(&node.tree, ctx, origin);
            tasks.spawn(async move { (id, signal.collect::<Vec<Event>>().await) });
        }

        let mut traces = HashMap::with_capacity(nodes.len());
        while let Some(joined) = tasks.join_next().await {
            let (id, events) = joined?;
            traces.insert(id, events);
        }

        let report = EvaluationReport {
            started_at,
            latest_input_time: ctx.latest_input_time(),
            traces,
        };
        info!(
            "Evaluation finished: {} nodes, {} events",
            report.traces.len(),
            report.event_count()
        );
        Ok(report)
    }
}
