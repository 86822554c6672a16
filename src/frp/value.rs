// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event payloads and identities
//!
//! Both `Value` and `EventId` are binary trees: a combinator that joins two
//! occurrences into one keeps both halves, so a combined output can always
//! be traced back to the inputs that produced it.
//!
//! ```text
//! zip(input1, input2)
//!
//!   EventId::Combined(#a1, #b1)      Value::Combined(1, "a")
//!          /        \                       /      \
//!       #a1          #b1                  1        "a"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Payload carried by an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Integer payload
    Int(i64),
    /// String payload
    String(String),
    /// Payload of a combined event: (left, right)
    Combined(Box<Value>, Box<Value>),
}

impl Value {
    /// Join two payloads into one
    pub fn combined(left: Value, right: Value) -> Self {
        Value::Combined(Box::new(left), Box::new(right))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Combined(left, right) => write!(f, "({left}, {right})"),
        }
    }
}

/// Identity of an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventId {
    /// Identity of an input event
    Single(Uuid),
    /// Identity of a combined event: (left, right)
    Combined(Box<EventId>, Box<EventId>),
}

impl EventId {
    /// Fresh identity token
    pub fn new() -> Self {
        EventId::Single(Uuid::now_v7())
    }

    /// Join two identities into one
    pub fn combined(left: EventId, right: EventId) -> Self {
        EventId::Combined(Box::new(left), Box::new(right))
    }

    /// Input identities this id was built from, left to right
    pub fn sources(&self) -> Vec<Uuid> {
        let mut out = Vec::new();
        self.collect_sources(&mut out);
        out
    }

    fn collect_sources(&self, out: &mut Vec<Uuid>) {
        match self {
            EventId::Single(id) => out.push(*id),
            EventId::Combined(left, right) => {
                left.collect_sources(out);
                right.collect_sources(out);
            }
        }
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Single(id) => write!(f, "{id}"),
            EventId::Combined(left, right) => write!(f, "({left}, {right})"),
        }
    }
}
