use std::collections::HashMap;
use std::sync::Mutex;
use futures::stream::{self, Stream};
use log::info;
use tokio::sync::watch;
use uuid::Uuid;

use crate::state::model::SyncState;

// Single-slot, replay-latest broadcaster. The slot always holds the most
// recently published state; every observer gets its own watch channel, so a
// slow observer skips superseded values instead of stalling the publisher.
pub struct StateBroadcaster {
    current: Mutex<SyncState>,
    observers: Mutex<HashMap<Uuid, watch::Sender<SyncState>>>,
}

impl StateBroadcaster {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(SyncState::Loading),
            observers: Mutex::new(HashMap::new()),
        }
    }

    // Lock order everywhere is current before observers, so a subscribe
    // between slot update and fan-out cannot observe a value twice.
    pub fn publish(&self, state: SyncState) -> Result<usize, String> {
        let mut current = self.current.lock()
            .map_err(|_| "State lock poisoned".to_string())?;
        let mut observers = self.observers.lock()
            .map_err(|_| "Observer lock poisoned".to_string())?;

        // Re-publishing the value already held in the slot is a no-op for
        // observers
        if *current == state {
            return Ok(observers.len());
        }
        *current = state.clone();

        observers.retain(|id, feed| {
            if feed.send(state.clone()).is_err() {
                info!("Removing observer {} with dropped feed", id);
                false
            } else {
                true
            }
        });

        if !observers.is_empty() {
            info!("Published {} state to {} observers", state.label(), observers.len());
        }
        Ok(observers.len())
    }

    pub fn subscribe(&self) -> Result<StateSubscription, String> {
        let current = self.current.lock()
            .map_err(|_| "State lock poisoned".to_string())?;
        let mut observers = self.observers.lock()
            .map_err(|_| "Observer lock poisoned".to_string())?;

        let id = Uuid::new_v4();
        let (tx, rx) = watch::channel(current.clone());
        observers.insert(id, tx);

        info!("Observer {} subscribed ({} active)", id, observers.len());
        Ok(StateSubscription {
            id,
            feed: rx,
            replayed: false,
        })
    }

    pub fn unsubscribe(&self, id: Uuid) {
        if let Ok(mut observers) = self.observers.lock() {
            if observers.remove(&id).is_some() {
                info!("Observer {} unsubscribed ({} active)", id, observers.len());
            }
        }
    }

    pub fn current_state(&self) -> SyncState {
        self.current.lock()
            .map(|state| state.clone())
            .unwrap_or(SyncState::Error {
                message: "State lock poisoned".to_string(),
            })
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock()
            .map(|observers| observers.len())
            .unwrap_or(0)
    }
}

// One observer's view of the state feed. Yields the value current at
// subscribe time first, then each subsequently published value in publish
// order; superseded values an observer never polled for are skipped.
pub struct StateSubscription {
    id: Uuid,
    feed: watch::Receiver<SyncState>,
    replayed: bool,
}

impl StateSubscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn recv(&mut self) -> Option<SyncState> {
        if !self.replayed {
            self.replayed = true;
            // Unsubscribed before the first read: nothing to deliver
            if self.feed.has_changed().is_err() {
                return None;
            }
            return Some(self.feed.borrow_and_update().clone());
        }

        match self.feed.changed().await {
            Ok(()) => Some(self.feed.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = SyncState> {
        stream::unfold(self, |mut subscription| async move {
            subscription.recv().await.map(|state| (state, subscription))
        })
    }
}
