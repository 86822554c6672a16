// Copyright (c) 2025 - Cowboy AI, Inc.
//! Timestamp reporting
//!
//! Events leave the engine with whatever `time` their producer gave them
//! (leaf times, or `0.0` for combined events). The reporting layer replaces
//! it with the moment the root of the tree actually emitted the event:
//!
//! ```text
//! reported_time = (now - evaluation_origin) * reporting_factor
//! ```
//!
//! Output times of pairing combinators are therefore observation times, not
//! a function of their operands' recorded times.

use crate::errors::StreamResult;
use crate::frp::{Clock, CombinatorTree, Event, EventSignal, Time};
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::time::Instant;
use uuid::Uuid;

/// Identity of a requested node in a bulk evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tree paired with the identity its results are keyed by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub tree: CombinatorTree,
}

impl Node {
    pub fn new(tree: CombinatorTree) -> Self {
        Self {
            id: NodeId::new(),
            tree,
        }
    }
}

impl From<CombinatorTree> for Node {
    fn from(tree: CombinatorTree) -> Self {
        Self::new(tree)
    }
}

/// Root output of an evaluation with reported times attached
///
/// Lazily produced, finite and not restartable. Dropping it abandons the
/// evaluation.
pub struct ReportedSignal {
    inner: EventSignal,
    clock: Arc<dyn Clock>,
    origin: Instant,
    reporting_factor: f64,
}

impl ReportedSignal {
    pub(crate) fn new(
        inner: EventSignal,
        clock: Arc<dyn Clock>,
        origin: Instant,
        reporting_factor: f64,
    ) -> Self {
        Self {
            inner,
            clock,
            origin,
            reporting_factor,
        }
    }

    fn reported_time(&self) -> Time {
        self.clock.elapsed_since(self.origin).as_secs_f64() * self.reporting_factor
    }
}

impl fmt::Debug for ReportedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportedSignal")
            .field("inner", &self.inner)
            .field("reporting_factor", &self.reporting_factor)
            .finish_non_exhaustive()
    }
}

impl Stream for ReportedSignal {
    type Item = Event;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(event)) => Poll::Ready(Some(event.with_time(this.reported_time()))),
            other => other,
        }
    }
}

/// Reported traces for every node of one bulk evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Wall-clock time the evaluation started
    pub started_at: DateTime<Utc>,
    /// Latest recorded time across both leaf inputs
    #[serde(default)]
    pub latest_input_time: Option<Time>,
    /// Reported events per node, in emission order
    pub traces: HashMap<NodeId, Vec<Event>>,
}

impl EvaluationReport {
    pub fn trace(&self, id: &NodeId) -> Option<&[Event]> {
        self.traces.get(id).map(Vec::as_slice)
    }

    /// Total number of reported events
    pub fn event_count(&self) -> usize {
        self.traces.values().map(Vec::len).sum()
    }

    /// Largest time across the traces and the leaf inputs, or `1.0` when
    /// there is none
    ///
    /// Timeline renderers scale their tick marks by this, so inputs that no
    /// requested node observed still fit on the axis.
    pub fn duration(&self) -> Time {
        self.traces
            .values()
            .flatten()
            .map(Event::time)
            .chain(self.latest_input_time)
            .max_by(f64::total_cmp)
            .unwrap_or(1.0)
    }

    pub fn to_json(&self) -> StreamResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
