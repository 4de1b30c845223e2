use crate::core::Place;
use crate::utils::error::Result;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// Immutable view of the held collection at one point in time.
#[derive(Debug, Clone, Default)]
pub struct PlacesSnapshot {
    version: u64,
    places: Arc<Vec<Place>>,
}

impl PlacesSnapshot {
    /// Incremented on every publish; 0 means nothing was ever published.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn get(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|place| place.id == id)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Place> {
        self.places.as_ref().clone()
    }
}

/// Held collection of places.
///
/// Readers get snapshots or subscribe to a watch channel, which hands the
/// latest snapshot to every new subscriber. Writers go through `replace` or
/// `modify`; both hold the write lock from reading the current snapshot
/// until the next one is published, so concurrent writers never overwrite
/// each other's changes.
pub struct PlaceCache {
    tx: watch::Sender<PlacesSnapshot>,
    write_lock: Mutex<()>,
}

impl PlaceCache {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(PlacesSnapshot::default());
        Self {
            tx,
            write_lock: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> PlacesSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlacesSnapshot> {
        self.tx.subscribe()
    }

    /// Publish `places` as the whole collection.
    pub fn replace(&self, places: Vec<Place>) -> PlacesSnapshot {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let version = self.tx.borrow().version + 1;
        self.publish(version, places)
    }

    /// Apply `change` to a copy of the current collection and publish the
    /// result. Nothing is published when `change` fails.
    pub fn modify<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Place>) -> Result<T>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.tx.borrow().clone();
        let mut places = current.to_vec();
        let outcome = change(&mut places)?;
        self.publish(current.version + 1, places);
        Ok(outcome)
    }

    fn publish(&self, version: u64, places: Vec<Place>) -> PlacesSnapshot {
        let snapshot = PlacesSnapshot {
            version,
            places: Arc::new(places),
        };
        tracing::debug!(
            "Publishing {} places (version {})",
            snapshot.len(),
            version
        );
        self.tx.send_replace(snapshot.clone());
        snapshot
    }
}

impl Default for PlaceCache {
    fn default() -> Self {
        Self::new()
    }
}
