// Copyright (c) 2025 - Cowboy AI, Inc.
//! Timed Events
//!
//! An `Event` is one occurrence on a timeline: an identity, a time in
//! seconds, a presentation color and a payload. Events never change after
//! creation; retiming produces a copy.
//!
//! # Time Origin
//!
//! - In a leaf array, `time` is relative to that array's own origin.
//! - In engine output, `time` is the reported time relative to the start of
//!   the evaluation.
//! - Combined events are created with a placeholder time of `0.0`; their
//!   real time is assigned when they are reported.
//!
//! # Examples
//!
//! ```rust,ignore
//! use cim_stream_combinators::frp::{Event, Value, Color};
//!
//! let one = Event::new(0.0, Value::Int(1)).with_color(Color::Red);
//! let a = Event::new(1.5, Value::from("a"));
//!
//! let pair = Event::combined(&one, &a);
//! assert_eq!(pair.value().to_string(), "(1, a)");
//! ```

use super::value::{EventId, Value};
use super::Time;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Presentation hint for renderers; ignored by evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    #[default]
    Green,
    Blue,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// A single timed occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    time: Time,
    color: Color,
    value: Value,
}

impl Event {
    /// Create an event with a fresh identity and the default color
    pub fn new(time: Time, value: Value) -> Self {
        Self {
            id: EventId::new(),
            time,
            color: Color::default(),
            value,
        }
    }

    /// Join two events into one
    ///
    /// The identity and payload are the structural pair of the operands,
    /// left first. The time is a placeholder: the reporting layer stamps the
    /// moment the combination was observed.
    pub fn combined(left: &Event, right: &Event) -> Self {
        Self {
            id: EventId::combined(left.id.clone(), right.id.clone()),
            time: 0.0,
            color: Color::Blue,
            value: Value::combined(left.value.clone(), right.value.clone()),
        }
    }

    /// Copy of this event at another time
    pub fn with_time(&self, time: Time) -> Self {
        Self {
            time,
            ..self.clone()
        }
    }

    /// Copy of this event with another color
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Ordering by time alone
    pub fn cmp_time(&self, other: &Event) -> Ordering {
        self.time.total_cmp(&other.time)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3} {} ({})", self.time, self.value, self.color)
    }
}
