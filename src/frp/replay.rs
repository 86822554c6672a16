// Copyright (c) 2025 - Cowboy AI, Inc.
//! Timeline - Timed Replay of Leaf Inputs
//!
//! A `Timeline` is a static leaf input sorted by time. Replaying it turns
//! the array into a live `EventSignal`: each event becomes observable
//! `event.time / speed_factor` seconds after the replay origin, and the
//! signal completes right after the last event.
//!
//! # Mathematical Model
//!
//! ```text
//! Timeline ≅ [(Time, Event)]   (ascending, stable on ties)
//!
//! replay(origin, speed):  e ↦ emitted at origin + e.time / speed
//! ```
//!
//! # Characteristics
//!
//! - **Sorted once**: construction performs a stable sort by time
//! - **Replayable**: every call to `replay` starts an independent pass
//! - **Single-pass signals**: each replayed signal is consumed once
//!
//! # Examples
//!
//! ```rust,ignore
//! let timeline = Timeline::from_events(vec![
//!     Event::new(1.0, Value::Int(2)),
//!     Event::new(0.0, Value::Int(1)),
//! ]);
//!
//! // Replays 1 immediately and 2 after 100 ms
//! let signal = timeline.replay(Arc::new(TokioClock), TokioClock.now(), 10.0);
//! ```

use super::clock::Clock;
use super::event::Event;
use super::signal::EventSignal;
use super::Time;
use crate::errors::{StreamError, StreamResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Deadlines beyond this horizon are treated as unreachable
const REPLAY_HORIZON: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Leaf input sorted by time, shareable across concurrent replays
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    events: Arc<[Event]>,
}

impl Timeline {
    /// Create a timeline from events in any order
    ///
    /// Events are stably sorted by time, so ties keep their input order.
    pub fn from_events(mut events: Vec<Event>) -> Self {
        events.sort_by(Event::cmp_time);
        Self {
            events: events.into(),
        }
    }

    /// Like `from_events`, but rejects events whose time is not finite
    pub fn try_from_events(events: Vec<Event>) -> StreamResult<Self> {
        if let Some(bad) = events.iter().find(|e| !e.time().is_finite()) {
            return Err(StreamError::InvalidEvent(format!(
                "event {} has non-finite time {}",
                bad.id(),
                bad.time()
            )));
        }
        Ok(Self::from_events(events))
    }

    /// Events in replay order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Reject events that cannot be replayed at `speed_factor`
    ///
    /// An event whose scaled delay lies beyond the replay horizon would
    /// never be observed.
    pub fn check_replayable(&self, speed_factor: f64) -> StreamResult<()> {
        let horizon = REPLAY_HORIZON.as_secs_f64();
        match self.events.iter().find(|e| e.time() / speed_factor > horizon) {
            Some(bad) => Err(StreamError::InvalidEvent(format!(
                "event {} at t={} replays more than {}s after the origin at speed {}",
                bad.id(),
                bad.time(),
                horizon,
                speed_factor
            ))),
            None => Ok(()),
        }
    }

    /// Start a replay pass
    ///
    /// Each event is stamped with its deadline. Before sleeping towards a
    /// deadline the replay announces it as progress, so readers know
    /// nothing earlier is coming.
    ///
    /// # Arguments
    ///
    /// * `clock` - Clock used for the per-event wake-ups
    /// * `origin` - Instant that time `0.0` maps to
    /// * `speed_factor` - Recorded seconds per replayed second
    pub fn replay(&self, clock: Arc<dyn Clock>, origin: Instant, speed_factor: f64) -> EventSignal {
        let events = Arc::clone(&self.events);

        EventSignal::spawn("replay", move |mut emitter| async move {
            for event in events.iter() {
                let deadline = replay_deadline(origin, event.time(), speed_factor)
                    .ok_or_else(|| {
                        StreamError::InvalidEvent(format!(
                            "replay deadline for event {} at t={} is out of range",
                            event.id(),
                            event.time()
                        ))
                    })?;
                emitter.advance(deadline)?;
                clock.sleep_until(deadline).await;
                trace!("Replaying event {} at t={}", event.id(), event.time());
                emitter.emit(event.clone(), deadline)?;
            }
            Ok(())
        })
    }
}

impl From<Vec<Event>> for Timeline {
    fn from(events: Vec<Event>) -> Self {
        Self::from_events(events)
    }
}

/// Instant at which an event recorded at `time` becomes observable
///
/// Negative times replay immediately.
fn replay_deadline(origin: Instant, time: Time, speed_factor: f64) -> Option<Instant> {
    let seconds = (time / speed_factor).max(0.0);
    let delay = Duration::try_from_secs_f64(seconds).ok()?;
    if delay > REPLAY_HORIZON {
        return None;
    }
    origin.checked_add(delay)
}
