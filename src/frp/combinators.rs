// Copyright (c) 2025 - Cowboy AI, Inc.
//! Signal Combinators
//!
//! This module provides the combinators that compose live `EventSignal`s.
//! Each combinator takes ownership of its operand signals (which are already
//! running) and spawns one task that selects across them and writes to a
//! fresh output signal.
//!
//! # Available Combinators
//!
//! | Combinator       | Emits                                   | Completes when        |
//! |------------------|-----------------------------------------|-----------------------|
//! | `merge`          | every event, in arrival order           | both operands done    |
//! | `chain`          | all of left, then all of right          | right done            |
//! | `zip`            | n-th left paired with n-th right        | either side exhausted |
//! | `combine_latest` | latest left + latest right on each hit  | both operands done    |
//! | `adjacent_pairs` | each event paired with its predecessor  | operand done          |
//!
//! Pairing combinators build their output with `Event::combined`, so the
//! output identity and payload are `(left, right)` pairs and the time is a
//! placeholder until the event is reported.
//!
//! # Ordering
//!
//! Operands are read by logical stamp, not by arrival on the channel. An
//! event from the right operand is only released once the left operand can
//! no longer deliver anything at or before its stamp, so simultaneous
//! events always come out left first, however the runtime schedules the
//! tasks involved. Outputs are stamped as follows:
//!
//! | Combinator       | Output stamp                                   |
//! |------------------|------------------------------------------------|
//! | `merge`          | the operand event's stamp                      |
//! | `chain`          | left stamps; right stamps raised to left's end |
//! | `zip`            | the later of the two paired stamps             |
//! | `combine_latest` | stamp of the event that triggered the output   |
//! | `adjacent_pairs` | stamp of the newer event                       |
//!
//! # Examples
//!
//! ```rust,ignore
//! use cim_stream_combinators::frp::combinators::*;
//!
//! let ints = sample_int().replay(clock.clone(), origin, 10.0);
//! let strings = sample_string().replay(clock, origin, 10.0);
//!
//! let pairs = zip(ints, strings);
//! // (1, a), (2, b), (3, c), (4, d), (5, e)
//! ```

use super::event::Event;
use super::signal::{Emitter, EventSignal, Update};
use crate::errors::StreamResult;
use std::collections::VecDeque;
use tokio::time::Instant;

/// How far an operand has got on the logical timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Horizon {
    /// Nothing announced yet
    Unknown,
    /// Nothing still to come is stamped before this instant
    At(Instant),
    /// Completed, nothing left to deliver
    Done,
}

impl Horizon {
    fn instant(self) -> Option<Instant> {
        match self {
            Horizon::At(at) => Some(at),
            Horizon::Unknown | Horizon::Done => None,
        }
    }
}

/// Read side of one operand, with events received but not yet used
struct Operand {
    signal: EventSignal,
    pending: VecDeque<(Event, Instant)>,
    progress: Option<Instant>,
    open: bool,
}

impl Operand {
    fn new(signal: EventSignal) -> Self {
        Self {
            signal,
            pending: VecDeque::new(),
            progress: None,
            open: true,
        }
    }

    /// Receive one update. Cancel-safe.
    async fn pull(&mut self) {
        match self.signal.recv_update().await {
            Some(Update::Event(event, at)) => {
                self.progress = self.progress.max(Some(at));
                self.pending.push_back((event, at));
            }
            Some(Update::Progress(at)) => self.progress = self.progress.max(Some(at)),
            None => self.open = false,
        }
    }

    fn horizon(&self) -> Horizon {
        match (self.pending.front(), self.open, self.progress) {
            (Some((_, at)), _, _) => Horizon::At(*at),
            (None, false, _) => Horizon::Done,
            (None, true, Some(at)) => Horizon::At(at),
            (None, true, None) => Horizon::Unknown,
        }
    }

    fn head(&self) -> Option<Instant> {
        self.pending.front().map(|(_, at)| *at)
    }

    fn pop(&mut self) -> Option<(Event, Instant)> {
        self.pending.pop_front()
    }

    fn exhausted(&self) -> bool {
        !self.open && self.pending.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Two operands read as one sequence in stamp order, ties going left
struct Interleave {
    left: Operand,
    right: Operand,
}

impl Interleave {
    fn new(left: EventSignal, right: EventSignal) -> Self {
        Self {
            left: Operand::new(left),
            right: Operand::new(right),
        }
    }

    /// Next operand event; `None` once both operands are exhausted
    ///
    /// Progress of both operands is forwarded through `emitter` while
    /// waiting, so readers further up are never held back by this node.
    async fn next(
        &mut self,
        emitter: &mut Emitter,
    ) -> StreamResult<Option<(Side, Event, Instant)>> {
        loop {
            let left = self.left.horizon();
            let right = self.right.horizon();
            if let Some(frontier) = left.min(right).instant() {
                emitter.advance(frontier)?;
            }

            if let Some(at) = self.left.head() {
                if Horizon::At(at) <= right {
                    return Ok(self.left.pop().map(|(event, at)| (Side::Left, event, at)));
                }
            }
            if let Some(at) = self.right.head() {
                if Horizon::At(at) < left {
                    return Ok(self.right.pop().map(|(event, at)| (Side::Right, event, at)));
                }
            }
            if left == Horizon::Done && right == Horizon::Done {
                return Ok(None);
            }

            tokio::select! {
                biased;
                _ = self.left.pull(), if self.left.open => {}
                _ = self.right.pull(), if self.right.open => {}
                else => return Ok(None),
            }
        }
    }
}

/// Interleave two signals in time order
///
/// Events pass through unchanged; simultaneous events keep left before
/// right.
///
/// # Arguments
///
/// * `left` - First signal
/// * `right` - Second signal
pub fn merge(left: EventSignal, right: EventSignal) -> EventSignal {
    EventSignal::spawn("merge", move |mut emitter| async move {
        let mut operands = Interleave::new(left, right);
        while let Some((_, event, at)) = operands.next(&mut emitter).await? {
            emitter.emit(event, at)?;
        }
        Ok(())
    })
}

/// Emit all of `left`, then all of `right`
///
/// `right` keeps running while `left` drains; its events are buffered and
/// released once `left` completes.
pub fn chain(mut left: EventSignal, mut right: EventSignal) -> EventSignal {
    EventSignal::spawn("chain", move |mut emitter| async move {
        while let Some(update) = left.recv_update().await {
            emitter.forward(update)?;
        }
        drop(left);

        // Buffered stamps are raised to where left ended
        while let Some(update) = right.recv_update().await {
            emitter.forward(update)?;
        }
        Ok(())
    })
}

/// Pair the n-th event of `left` with the n-th event of `right`
///
/// Pairing is positional, not time-nearest. The output completes as soon
/// as one side has completed with no unpaired events left, since no
/// further pair can form.
pub fn zip(left: EventSignal, right: EventSignal) -> EventSignal {
    EventSignal::spawn("zip", move |mut emitter| async move {
        let mut left = Operand::new(left);
        let mut right = Operand::new(right);

        loop {
            while left.head().is_some() && right.head().is_some() {
                if let (Some((l, l_at)), Some((r, r_at))) = (left.pop(), right.pop()) {
                    emitter.emit(Event::combined(&l, &r), l_at.max(r_at))?;
                }
            }

            if left.exhausted() || right.exhausted() {
                break;
            }
            // A future pair is no earlier than the later of both horizons
            if let Some(frontier) = left.horizon().max(right.horizon()).instant() {
                emitter.advance(frontier)?;
            }

            tokio::select! {
                biased;
                _ = left.pull(), if left.open => {}
                _ = right.pull(), if right.open => {}
                else => break,
            }
        }
        Ok(())
    })
}

/// On every event from either side, pair the latest of both sides
///
/// Nothing is emitted until both sides have produced an event. Output is
/// always `(latest left, latest right)`, whichever side triggered it.
pub fn combine_latest(left: EventSignal, right: EventSignal) -> EventSignal {
    EventSignal::spawn("combine_latest", move |mut emitter| async move {
        let mut operands = Interleave::new(left, right);
        let mut latest_left: Option<Event> = None;
        let mut latest_right: Option<Event> = None;

        while let Some((side, event, at)) = operands.next(&mut emitter).await? {
            match side {
                Side::Left => latest_left = Some(event),
                Side::Right => latest_right = Some(event),
            }
            if let (Some(l), Some(r)) = (&latest_left, &latest_right) {
                emitter.emit(Event::combined(l, r), at)?;
            }
        }
        Ok(())
    })
}

/// Pair every event with the one before it
///
/// The first event produces nothing on its own.
pub fn adjacent_pairs(mut source: EventSignal) -> EventSignal {
    EventSignal::spawn("adjacent_pairs", move |mut emitter| async move {
        let mut previous: Option<Event> = None;

        while let Some(update) = source.recv_update().await {
            match update {
                Update::Event(event, at) => {
                    match &previous {
                        Some(prev) => emitter.emit(Event::combined(prev, &event), at)?,
                        None => emitter.advance(at)?,
                    }
                    previous = Some(event);
                }
                Update::Progress(at) => emitter.advance(at)?,
            }
        }
        Ok(())
    })
}
