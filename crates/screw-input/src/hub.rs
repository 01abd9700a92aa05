//! Gamepad event fan-out
//!
//! The application creates one [`InputHub`] and hands clones to whatever
//! produces or consumes gamepad events. Each consumer holds a
//! [`Subscription`]; dropping it unregisters the listener.
//!
//! ```text
//! backend thread → hub.publish() → flume channel per subscriber → try_recv()/drain()
//! ```
//!
//! Publishing never blocks: a subscriber whose queue is full misses the
//! event, and subscribers whose receiver is gone are pruned. Events are
//! stamped when published, so consumers polling on a tick still see when a
//! button actually went down.

use flume::{Receiver, Sender, TryRecvError, TrySendError};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Instant;

use crate::types::InputEvent;

/// An event with the time it was published
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent {
    pub event: InputEvent,
    pub at: Instant,
}

/// Per-subscriber queue size
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

struct Listener {
    id: u64,
    tx: Sender<TimedEvent>,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<Listener>,
}

type Shared = Mutex<Listeners>;

fn lock(shared: &Shared) -> MutexGuard<'_, Listeners> {
    // A panicking subscriber can't leave the list half-updated
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared gamepad event hub
#[derive(Clone)]
pub struct InputHub {
    shared: Arc<Shared>,
    capacity: usize,
}

impl Default for InputHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InputHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputHub")
            .field("subscribers", &self.subscriber_count())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl InputHub {
    /// Create a hub with the default queue capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a hub with a custom per-subscriber queue capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Listeners::default())),
            capacity: capacity.max(1),
        }
    }

    /// Register a new listener
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = flume::bounded(self.capacity);
        let mut listeners = lock(&self.shared);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push(Listener { id, tx });
        log::debug!("input: subscriber {} registered", id);

        Subscription {
            id,
            rx,
            hub: Arc::downgrade(&self.shared),
        }
    }

    /// Deliver an event to every listener without blocking, stamped now
    ///
    /// Returns the number of listeners that received it.
    pub fn publish(&self, event: InputEvent) -> usize {
        self.publish_at(event, Instant::now())
    }

    /// Deliver an event that happened at `at`
    pub fn publish_at(&self, event: InputEvent, at: Instant) -> usize {
        let timed = TimedEvent { event, at };
        let mut listeners = lock(&self.shared);
        let mut delivered = 0;

        listeners.entries.retain(|listener| match listener.tx.try_send(timed) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                log::warn!("input: subscriber {} queue full, dropping event", listener.id);
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("input: pruning disconnected subscriber {}", listener.id);
                false
            }
        });

        delivered
    }

    /// Number of registered listeners
    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared).entries.len()
    }
}

/// A listener registration; unregisters on drop
pub struct Subscription {
    id: u64,
    rx: Receiver<TimedEvent>,
    hub: Weak<Shared>,
}

impl Subscription {
    /// Take one pending event
    pub fn try_recv(&self) -> Option<TimedEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Take all pending events
    pub fn drain(&self) -> Vec<TimedEvent> {
        self.rx.try_iter().collect()
    }

    /// Receiver for blocking or `select`-style waiting
    pub fn receiver(&self) -> &Receiver<TimedEvent> {
        &self.rx
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("pending", &self.rx.len())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.hub.upgrade() {
            lock(&shared).entries.retain(|listener| listener.id != self.id);
            log::debug!("input: subscriber {} unregistered", self.id);
        }
    }
}
