// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reference leaf inputs
//!
//! Two small editable timelines used by the `stream-trace` binary and as
//! default data for renderers.

use crate::frp::{Color, Event, Value};

/// Integer events 1..=5 at t = 0, 1, 2, 5, 8 (red)
pub fn sample_int() -> Vec<Event> {
    [(0.0, 1), (1.0, 2), (2.0, 3), (5.0, 4), (8.0, 5)]
        .into_iter()
        .map(|(time, value)| Event::new(time, Value::Int(value)).with_color(Color::Red))
        .collect()
}

/// String events "a".."e" at t = 1.5, 2.5, 4.5, 6.5, 7.5 (green)
pub fn sample_string() -> Vec<Event> {
    [(1.5, "a"), (2.5, "b"), (4.5, "c"), (6.5, "d"), (7.5, "e")]
        .into_iter()
        .map(|(time, value)| Event::new(time, Value::from(value)))
        .collect()
}
