// Copyright (c) 2025 - Cowboy AI, Inc.
//! Functional Reactive Programming (FRP) over Timed Events
//!
//! This module provides the building blocks of combinator evaluation: the
//! event model, timed replay of static inputs, live signals, the combinators
//! that join them, and the tree that describes a combination.
//!
//! # Core Concepts
//!
//! ## Event
//!
//! An immutable, timed occurrence carrying a `Value`. Combining two events
//! produces an event whose identity and value are structural pairs.
//!
//! ```text
//! Time: ────────────────────────────→
//! Value:      ●       ●   ●       ●
//! ```
//!
//! ## Timeline
//!
//! A static leaf input sorted by time. Replaying it yields each event after
//! a delay proportional to its recorded time.
//!
//! ## EventSignal
//!
//! A live, finite, single-pass sequence of events. Every node of an
//! evaluated tree is one signal; dropping a signal cancels everything
//! feeding it.
//!
//! ## CombinatorTree
//!
//! Pure description of how `input1` and `input2` are combined:
//!
//! ```text
//! zip(merge(input1, input2), input2.adjacentPairs())
//!
//!              zip
//!            /     \
//!        merge    adjacentPairs
//!        /   \         |
//!   input1  input2   input2
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use cim_stream_combinators::frp::*;
//!
//! let clock: Arc<dyn Clock> = Arc::new(TokioClock);
//! let origin = clock.now();
//!
//! let ints = Timeline::from_events(sample_int()).replay(clock.clone(), origin, 10.0);
//! let strings = Timeline::from_events(sample_string()).replay(clock, origin, 10.0);
//!
//! let merged: Vec<Event> = combinators::merge(ints, strings).collect().await;
//! ```

pub mod clock;
pub mod combinators;
pub mod event;
pub mod replay;
pub mod signal;
pub mod tree;
pub mod value;

pub use clock::{Clock, TokioClock};
pub use event::{Color, Event};
pub use replay::Timeline;
pub use signal::{Emitter, EventSignal};
pub use tree::{CombinatorTree, Input};
pub use value::{EventId, Value};

/// Time representation (seconds, relative to a timeline's origin)
pub type Time = f64;
