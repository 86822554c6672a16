// Copyright (c) 2025 - Cowboy AI, Inc.
//! EventSignal - Live Event Sequences
//!
//! An `EventSignal` is the live output of one node of a combinator tree: a
//! finite, single-pass sequence of `Event`s that becomes available over time.
//!
//! # Structure
//!
//! ```text
//!   producer task ──Emitter──> unbounded channel ──> EventSignal (Stream)
//!        │                                               │
//!        └──────────── aborted when the signal drops ────┘
//! ```
//!
//! Every signal owns the task that feeds it. Combinator tasks in turn own
//! their child signals, so dropping the root of a tree tears down every
//! task and pending timer below it.
//!
//! # Logical Time
//!
//! Each event travels with the instant it logically happened at: the replay
//! deadline of the leaf event behind it, or the instant a combinator could
//! first produce it. Between events a producer may also announce progress,
//! a promise that nothing it sends later is stamped earlier. Combinators
//! order events across their operands by these stamps, never by which task
//! the runtime happened to run first.
//!
//! ```text
//!   replay ──Progress(t0)──Event(1, t0)──Progress(t1)──Event(2, t1)── ...
//! ```
//!
//! Readers that only want events (`recv`, the `Stream` impl) never see
//! progress announcements.
//!
//! # Characteristics
//!
//! - **Single-pass**: events are consumed as they are read
//! - **Finite**: ends once the producer finishes
//! - **Cancel-on-drop**: no producer outlives its signal
//! - **Monotonic stamps**: stamps never decrease along a signal
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//!
//! let signal = timeline.replay(clock, origin, 10.0);
//! let events: Vec<Event> = signal.collect().await;
//! ```

use super::event::Event;
use crate::errors::{StreamError, StreamResult};
use futures::{ready, Stream};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{trace, warn};

/// One message on a signal's channel
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Update {
    /// An event and its logical instant
    Event(Event, Instant),
    /// Nothing sent later is stamped before this instant
    Progress(Instant),
}

/// Write side of a signal, handed to its producer
#[derive(Debug)]
pub struct Emitter {
    sender: mpsc::UnboundedSender<Update>,
    frontier: Option<Instant>,
}

impl Emitter {
    /// Push an event downstream, stamped with its logical instant
    ///
    /// A stamp earlier than what was already sent or announced is raised to
    /// it. Fails with `ConsumerGone` once the signal has been dropped;
    /// producers return on that error to stop cooperatively.
    pub fn emit(&mut self, event: Event, at: Instant) -> StreamResult<()> {
        let at = self.frontier.map_or(at, |frontier| frontier.max(at));
        self.frontier = Some(at);
        self.send(Update::Event(event, at))
    }

    /// Announce that no later event will be stamped before `frontier`
    ///
    /// Announcements that do not move past what was already sent are
    /// skipped.
    pub fn advance(&mut self, frontier: Instant) -> StreamResult<()> {
        if self.frontier.is_some_and(|sent| sent >= frontier) {
            return Ok(());
        }
        self.frontier = Some(frontier);
        self.send(Update::Progress(frontier))
    }

    /// Pass an upstream update on, keeping stamps monotonic
    pub(crate) fn forward(&mut self, update: Update) -> StreamResult<()> {
        match update {
            Update::Event(event, at) => self.emit(event, at),
            Update::Progress(at) => self.advance(at),
        }
    }

    fn send(&self, update: Update) -> StreamResult<()> {
        self.sender
            .send(update)
            .map_err(|_| StreamError::ConsumerGone)
    }
}

/// Aborts the wrapped task when dropped
#[derive(Debug)]
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Live, single-pass sequence of events fed by its own task
pub struct EventSignal {
    label: &'static str,
    receiver: mpsc::UnboundedReceiver<Update>,
    _producer: AbortOnDrop,
}

impl EventSignal {
    /// Spawn `body` as the producer of a new signal
    ///
    /// The signal completes when `body` returns. Must be called from within
    /// a Tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `label` - Name of the producing node, used in logs
    /// * `body` - Producer; receives the `Emitter` for the signal
    pub fn spawn<F, Fut>(label: &'static str, body: F) -> Self
    where
        F: FnOnce(Emitter) -> Fut,
        Fut: Future<Output = StreamResult<()>> + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let producer = body(Emitter {
            sender,
            frontier: None,
        });

        let handle = tokio::spawn(async move {
            match producer.await {
                Ok(()) => trace!("{} signal completed", label),
                Err(StreamError::ConsumerGone) => {
                    trace!("{} signal abandoned by its consumer", label)
                }
                Err(e) => warn!("{} signal failed: {}", label, e),
            }
        });

        Self {
            label,
            receiver,
            _producer: AbortOnDrop(handle),
        }
    }

    /// Wait for the next event; `None` once the signal has completed
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await? {
                Update::Event(event, _) => return Some(event),
                Update::Progress(_) => continue,
            }
        }
    }

    /// Wait for the next event or progress announcement
    ///
    /// Cancel-safe: may be used as a `tokio::select!` branch.
    pub(crate) async fn recv_update(&mut self) -> Option<Update> {
        self.receiver.recv().await
    }
}

impl fmt::Debug for EventSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSignal")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Stream for EventSignal {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        loop {
            match ready!(self.receiver.poll_recv(cx)) {
                Some(Update::Event(event, _)) => return Poll::Ready(Some(event)),
                Some(Update::Progress(_)) => continue,
                None => return Poll::Ready(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frp::Value;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signal_yields_emitted_events_then_completes() {
        let now = Instant::now();
        let signal = EventSignal::spawn("test", move |mut emitter| async move {
            emitter.advance(now)?;
            emitter.emit(Event::new(0.0, Value::Int(1)), now)?;
            emitter.advance(now + Duration::from_secs(1))?;
            emitter.emit(Event::new(1.0, Value::Int(2)), now + Duration::from_secs(1))?;
            Ok(())
        });

        let values: Vec<Value> = signal.map(|e| e.value().clone()).collect().await;
        assert_eq!(values, vec![Value::Int(1), Value::Int(2)]);
    }

    #[tokio::test]
    async fn test_recv_skips_progress() {
        let now = Instant::now();
        let mut signal = EventSignal::spawn("test", move |mut emitter| async move {
            emitter.advance(now + Duration::from_secs(1))?;
            emitter.advance(now + Duration::from_secs(2))?;
            emitter.emit(Event::new(2.0, Value::Int(1)), now + Duration::from_secs(2))
        });

        assert_eq!(signal.recv().await.map(|e| e.value().clone()), Some(Value::Int(1)));
        assert!(signal.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_stamps_never_go_backwards() {
        let now = Instant::now();
        let later = now + Duration::from_secs(5);
        let mut signal = EventSignal::spawn("test", move |mut emitter| async move {
            emitter.advance(later)?;
            // Neither a stale announcement nor a stale stamp is sent as is
            emitter.advance(now)?;
            emitter.emit(Event::new(0.0, Value::Int(1)), now)
        });

        assert_eq!(signal.recv_update().await, Some(Update::Progress(later)));
        match signal.recv_update().await {
            Some(Update::Event(_, at)) => assert_eq!(at, later),
            other => panic!("expected an event, got {other:?}"),
        }
        assert_eq!(signal.recv_update().await, None);
    }

    #[tokio::test]
    async fn test_empty_producer_completes_immediately() {
        let mut signal = EventSignal::spawn("empty", |_emitter| async { Ok(()) });
        assert!(signal.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_signal_aborts_producer() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let signal = EventSignal::spawn("slow", move |mut emitter| async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            flag.store(true, Ordering::SeqCst);
            emitter.emit(Event::new(0.0, Value::Int(1)), Instant::now())
        });
        tokio::task::yield_now().await;
        drop(signal);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_emit_after_drop_reports_consumer_gone() {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut emitter = Emitter {
            sender,
            frontier: None,
        };
        drop(receiver);

        assert!(matches!(
            emitter.emit(Event::new(0.0, Value::Int(1)), Instant::now()),
            Err(StreamError::ConsumerGone)
        ));
    }
}
