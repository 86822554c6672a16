//! Stream combinator evaluation for the Composable Information Machine
//!
//! This crate evaluates trees of stream combinators (merge, chain, zip,
//! combineLatest, adjacentPairs) over two timed leaf inputs and records,
//! for every node, when each output event was emitted.

pub mod config;
pub mod engine;
pub mod errors;
pub mod frp;
pub mod samples;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::{Engine, EvaluationContext, EvaluationReport, Node, NodeId, ReportedSignal};
pub use errors::{StreamError, StreamResult};
pub use frp::{CombinatorTree, Event, EventId, Value};
