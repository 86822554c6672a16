// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for combinator evaluation

use thiserror::Error;

use crate::engine::NodeId;

/// Errors that can occur while building or evaluating combinator trees
///
/// Empty inputs, early completion and abandoned evaluations are not errors;
/// they are ordinary outcomes of the combinator rules.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A leaf event cannot be placed on the timeline
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Malformed combinator expression
    #[error("Parse error at offset {offset}: {message}")]
    Parse {
        /// Byte offset into the expression
        offset: usize,
        /// What was expected
        message: String,
    },

    /// The same node was requested twice in one evaluation
    #[error("Duplicate node in evaluation request: {0}")]
    DuplicateNode(NodeId),

    /// An evaluation task panicked or was cancelled
    #[error("Evaluation task failed: {0}")]
    TaskFailed(String),

    /// The downstream consumer of a signal went away
    #[error("Signal consumer dropped")]
    ConsumerGone,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for combinator operations
pub type StreamResult<T> = Result<T, StreamError>;

impl From<serde_json::Error> for StreamError {
    fn from(err: serde_json::Error) -> Self {
        StreamError::Serialization(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StreamError {
    fn from(err: tokio::task::JoinError) -> Self {
        StreamError::TaskFailed(err.to_string())
    }
}
