//! Process-wide favorites set with durable storage and change broadcast.
//!
//! Storage holds a single JSON array of string identifiers under
//! [`FAVORITES_KEY`]. Reads never fail: missing, unreadable or malformed
//! data is an empty set. Every mutator persists first, then broadcasts the
//! full resulting set, including when nothing changed.

pub mod storage;

use std::path::PathBuf;
use std::sync::Arc;

use bestiary_model::EntityId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

pub use storage::{FavoritesStorage, JsonFileStorage, MemoryStorage, StorageError};

pub const FAVORITES_KEY: &str = "app-favorites";

const CHANNEL_CAPACITY: usize = 64;

/// Favorite identifiers in the order they were added. No duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    ids: Vec<EntityId>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntityId> {
        self.ids.iter()
    }

    /// Returns `false` when `id` was already present.
    pub fn insert(&mut self, id: EntityId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Returns `false` when `id` was absent.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        before != self.ids.len()
    }

    pub fn as_slice(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn into_vec(self) -> Vec<EntityId> {
        self.ids
    }
}

impl FromIterator<EntityId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = EntityId>>(iter: I) -> Self {
        let mut set = FavoriteSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a FavoriteSet {
    type Item = &'a EntityId;
    type IntoIter = std::slice::Iter<'a, EntityId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Notification sent after every mutation. Serializes as
/// `{"favorites": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesChanged {
    pub favorites: FavoriteSet,
}

#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("failed to persist favorites")]
    Storage(#[from] StorageError),

    #[error("failed to encode favorites")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct FavoritesStore {
    storage: Arc<dyn FavoritesStorage>,
    key: String,
    sender: broadcast::Sender<FavoritesChanged>,
    // Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn FavoritesStorage>) -> Self {
        Self::with_key(storage, FAVORITES_KEY)
    }

    pub fn with_key(storage: Arc<dyn FavoritesStorage>, key: impl Into<String>) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            storage,
            key: key.into(),
            sender,
            write_lock: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn open_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(JsonFileStorage::new(dir)))
    }

    /// Current favorites, read from storage on every call.
    pub fn get_all(&self) -> FavoriteSet {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return FavoriteSet::new(),
            Err(err) => {
                warn!(
                    key = %self.key,
                    error = %err,
                    "favorites storage unavailable, treating as empty"
                );
                return FavoriteSet::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => ids
                .into_iter()
                .filter_map(|raw| EntityId::new(raw).ok())
                .collect(),
            Err(err) => {
                warn!(key = %self.key, error = %err, "corrupt favorites data, treating as empty");
                FavoriteSet::new()
            }
        }
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.get_all().contains(id)
    }

    pub fn count(&self) -> usize {
        self.get_all().len()
    }

    pub fn add(&self, id: EntityId) -> Result<(), FavoritesError> {
        self.mutate(|set| set.insert(id))?;
        Ok(())
    }

    pub fn remove(&self, id: &EntityId) -> Result<(), FavoritesError> {
        self.mutate(|set| set.remove(id))?;
        Ok(())
    }

    /// Flip membership of `id`; returns whether it is a favorite afterwards.
    pub fn toggle(&self, id: EntityId) -> Result<bool, FavoritesError> {
        let set = self.mutate(|set| {
            if !set.remove(&id) {
                set.insert(id.clone());
            }
            true
        })?;
        Ok(set.contains(&id))
    }

    pub fn clear(&self) -> Result<(), FavoritesError> {
        let _guard = self.write_lock.lock();
        self.storage.remove(&self.key)?;
        self.broadcast(FavoriteSet::new());
        Ok(())
    }

    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesChanged> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn mutate<F>(&self, apply: F) -> Result<FavoriteSet, FavoritesError>
    where
        F: FnOnce(&mut FavoriteSet) -> bool,
    {
        let _guard = self.write_lock.lock();
        let mut set = self.get_all();
        if apply(&mut set) {
            let ids: Vec<&str> = set.iter().map(EntityId::as_str).collect();
            let encoded = serde_json::to_string(&ids)?;
            self.storage.set(&self.key, &encoded)?;
        }
        self.broadcast(set.clone());
        Ok(set)
    }

    fn broadcast(&self, favorites: FavoriteSet) {
        debug!(count = favorites.len(), "favorites changed");
        // No receivers is fine.
        let _ = self.sender.send(FavoritesChanged { favorites });
    }
}
