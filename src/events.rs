//! Navigation event log.
//!
//! Single writer (the simulation), bounded history, plus fire-and-forget
//! subscribers. A slow or vanished subscriber never stalls the writer.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, info, warn};

/// Kind of navigation event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    FoundPath,
    NoPath,
    ObstacleDetected,
    Replanned,
    NoAlternativePath,
    ArrivedGoal,
    ArrivedStart,
    Aborted,
    /// Control acknowledgements (reset, pause, ignored commands, ...)
    Notice,
}

impl EventKind {
    /// Short stable name used in logs and frame dumps
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::FoundPath => "found_path",
            EventKind::NoPath => "no_path",
            EventKind::ObstacleDetected => "obstacle_detected",
            EventKind::Replanned => "replanned",
            EventKind::NoAlternativePath => "no_alternative_path",
            EventKind::ArrivedGoal => "arrived_goal",
            EventKind::ArrivedStart => "arrived_start",
            EventKind::Aborted => "aborted",
            EventKind::Notice => "notice",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single logged event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    /// Insertion counter, strictly increasing
    pub seq: u64,
    /// Simulation time in seconds
    pub time: f64,
    pub kind: EventKind,
    pub message: Option<String>,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>8.2}s] {}", self.time, self.kind)?;
        if let Some(msg) = &self.message {
            write!(f, ": {}", msg)?;
        }
        Ok(())
    }
}

/// Bounded, ordered event log with subscribers.
#[derive(Debug)]
pub struct EventSink {
    capacity: usize,
    events: VecDeque<Event>,
    next_seq: u64,
    subscribers: Vec<Sender<Event>>,
    /// Events not delivered to a subscriber because its queue was full
    dropped: u64,
}

impl EventSink {
    /// Create a sink keeping at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity),
            next_seq: 0,
            subscribers: Vec::new(),
            dropped: 0,
        }
    }

    /// Append an event, evicting the oldest when full.
    ///
    /// Returns the sequence number assigned to the event.
    pub fn push(&mut self, time: f64, kind: EventKind, message: Option<String>) -> u64 {
        let event = Event {
            seq: self.next_seq,
            time,
            kind,
            message,
        };
        self.next_seq += 1;

        match kind {
            EventKind::NoPath | EventKind::NoAlternativePath | EventKind::Aborted => {
                warn!("{}", event)
            }
            EventKind::Notice => debug!("{}", event),
            _ => info!("{}", event),
        }

        self.subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });

        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        let seq = event.seq;
        self.events.push_back(event);
        seq
    }

    /// Register a subscriber with a bounded queue of `capacity` events.
    pub fn subscribe(&mut self, capacity: usize) -> Receiver<Event> {
        let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
        self.subscribers.push(tx);
        rx
    }

    /// Up to `n` most recent events, oldest first
    pub fn recent(&self, n: usize) -> Vec<Event> {
        let skip = self.events.len().saturating_sub(n);
        self.events.iter().skip(skip).cloned().collect()
    }

    /// All retained events, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Most recent event
    pub fn last(&self) -> Option<&Event> {
        self.events.back()
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total number of events ever appended
    pub fn total(&self) -> u64 {
        self.next_seq
    }

    /// Count retained events of a kind
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Deliveries skipped because a subscriber queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Number of live subscribers (as of the last push)
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
