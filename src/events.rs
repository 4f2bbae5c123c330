//! Scoped publish/subscribe channel for storefront notifications.
//!
//! The bus belongs to whoever constructs it (typically the page context).
//! A [`Subscription`] stops listening when dropped, so the listener count is
//! an exact picture of who is still attached.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

const DEFAULT_CAPACITY: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// The shopping cart changed; carries the new number of items.
    CartUpdated { item_count: usize },
}

#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Delivers `event` to every live subscription and returns how many
    /// there were.
    pub fn publish(&self, event: StoreEvent) -> usize {
        match self.sender.send(event) {
            Ok(listeners) => listeners,
            Err(broadcast::error::SendError(event)) => {
                log::debug!("No listeners for {event:?}");
                0
            }
        }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// A live listener on an [`EventBus`].
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<StoreEvent>,
}

impl Subscription {
    /// Waits for the next event; `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<StoreEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Subscriber lagged behind, skipped {skipped} events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns an already delivered event without waiting.
    pub fn try_next(&mut self) -> Option<StoreEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    log::warn!("Subscriber lagged behind, skipped {skipped} events");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}
