// Copyright (c) 2025 - Cowboy AI, Inc.
//! Evaluation inputs

use crate::config::{validate_factor, EngineConfig};
use crate::errors::StreamResult;
use crate::frp::{Event, Input, Time, Timeline};

/// The two leaf inputs and the replay speed for one evaluation
///
/// Immutable once built; cloning is cheap, so concurrent node evaluations
/// share one context.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    first: Timeline,
    second: Timeline,
    speed_factor: f64,
}

impl EvaluationContext {
    /// Build a context from unsorted leaf arrays
    ///
    /// Fails if `speed_factor` is not positive and finite, if any event
    /// time is not finite, or if an event would replay beyond the replay
    /// horizon at this speed.
    pub fn new(first: Vec<Event>, second: Vec<Event>, speed_factor: f64) -> StreamResult<Self> {
        validate_factor("speed_factor", speed_factor)?;
        let first = Timeline::try_from_events(first)?;
        let second = Timeline::try_from_events(second)?;
        first.check_replayable(speed_factor)?;
        second.check_replayable(speed_factor)?;
        Ok(Self {
            first,
            second,
            speed_factor,
        })
    }

    /// Build a context replaying at the configured speed
    pub fn from_config(
        first: Vec<Event>,
        second: Vec<Event>,
        config: &EngineConfig,
    ) -> StreamResult<Self> {
        Self::new(first, second, config.speed_factor)
    }

    /// Timeline backing a leaf
    pub fn timeline(&self, input: Input) -> &Timeline {
        match input {
            Input::First => &self.first,
            Input::Second => &self.second,
        }
    }

    pub fn first_input_events(&self) -> &[Event] {
        self.first.events()
    }

    pub fn second_input_events(&self) -> &[Event] {
        self.second.events()
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Latest recorded time across both inputs
    pub fn latest_input_time(&self) -> Option<Time> {
        self.first_input_events()
            .iter()
            .chain(self.second_input_events())
            .map(Event::time)
            .max_by(f64::total_cmp)
    }
}
