//! Spoken-style announcements for navigation events.
//!
//! The announcer drains an event subscription on its own thread and logs a
//! short phrase per event. It never feeds back into the simulation.

use crossbeam_channel::Receiver;
use std::thread::{self, JoinHandle};
use tracing::info;

use crate::error::Result;
use crate::events::{Event, EventKind};

/// Phrase for an event kind, if it is announced at all.
pub fn phrase(kind: EventKind) -> Option<&'static str> {
    match kind {
        EventKind::FoundPath => Some("Starting navigation to goal."),
        EventKind::NoPath => Some("No path found."),
        EventKind::ObstacleDetected => Some("Obstacle detected on path. Recalculating route."),
        EventKind::NoAlternativePath => Some("No alternative path found. Aborting navigation."),
        EventKind::ArrivedGoal => Some("Reached goal."),
        EventKind::ArrivedStart => Some("Navigation complete."),
        EventKind::Aborted => Some("Navigation aborted."),
        EventKind::Replanned | EventKind::Notice => None,
    }
}

/// Background announcer thread.
pub struct Announcer {
    handle: JoinHandle<usize>,
}

impl Announcer {
    /// Spawn a thread announcing every event received on `events`.
    ///
    /// The thread ends when the sending side (the event sink) is dropped.
    pub fn spawn(events: Receiver<Event>) -> Result<Self> {
        let handle = thread::Builder::new()
            .name("announcer".into())
            .spawn(move || {
                let mut spoken = 0;
                for event in events.iter() {
                    if let Some(text) = phrase(event.kind) {
                        info!("[SAY] {}", text);
                        spoken += 1;
                    }
                }
                spoken
            })?;
        Ok(Self { handle })
    }

    /// Wait for the thread to finish; returns the number of phrases spoken.
    pub fn join(self) -> usize {
        self.handle.join().unwrap_or_else(|_| {
            tracing::error!("announcer thread panicked");
            0
        })
    }
}
