//! Change notifications for live views.
//!
//! One watch channel per (owner, collection). A mutation bumps a version
//! counter; observers hold a [`Subscription`] and re-fetch the full list on
//! every wake, so a fresh fetch always replaces the previous list wholesale.
//! Dropping the handle is the teardown.

use daybook_domain::UserId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Tasks,
    Folders,
    Schedules,
}

#[derive(Clone, Default)]
pub struct ChangeFeed {
    channels: Arc<Mutex<HashMap<(String, Collection), watch::Sender<u64>>>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifies every live subscription for this owner and collection.
    /// Called after the store write succeeded, never before. A channel
    /// whose last subscriber has gone is dropped instead of bumped.
    pub fn publish(&self, owner: &UserId, collection: Collection) {
        let mut channels = self.channels.lock().unwrap();
        let key = (owner.as_str().to_string(), collection);
        if let Some(tx) = channels.get(&key) {
            if tx.receiver_count() == 0 {
                channels.remove(&key);
            } else {
                tx.send_modify(|version| *version += 1);
            }
        }
    }

    pub fn subscribe(&self, owner: &UserId, collection: Collection) -> Subscription {
        let mut channels = self.channels.lock().unwrap();
        // Sweep channels nobody listens to anymore, so the map tracks
        // live subscriptions rather than every key ever observed.
        channels.retain(|_, tx| tx.receiver_count() > 0);
        let tx = channels
            .entry((owner.as_str().to_string(), collection))
            .or_insert_with(|| watch::channel(0).0);
        Subscription {
            rx: tx.subscribe(),
        }
    }
}

/// One observer's handle on a collection. Owned by the observing client
/// for exactly as long as its view is active; dropping it releases the
/// subscription.
pub struct Subscription {
    rx: watch::Receiver<u64>,
}

impl Subscription {
    /// Waits until the collection changes. Returns `false` if the feed
    /// itself has gone away.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
