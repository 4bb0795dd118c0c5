//! Persistent favorites store
//!
//! Keeps the set of favorited coin ids in a small JSON key-value file
//! under one fixed key, mirroring durable key-value storage. Insertion
//! order is preserved. Operations are synchronous and fast; when the
//! list engine and the favorites engine share one store, last write
//! wins with no merge (accepted low-contention race).

use crate::constants::FAVORITES_STORAGE_KEY;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Persisted ordered set of favorited coin ids
///
/// Intended to be shared as one `Arc<FavoritesStore>` across engines.
pub struct FavoritesStore {
    path: PathBuf,
    ids: Mutex<Vec<String>>,
}

impl FavoritesStore {
    /// Opens (or lazily creates) the store at `{dir}/favorites.json`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let path = dir.into().join("favorites.json");
        let ids = Self::read_ids(&path);
        Self {
            path,
            ids: Mutex::new(ids),
        }
    }

    fn read_ids(path: &PathBuf) -> Vec<String> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_slice::<HashMap<String, Vec<String>>>(&bytes) {
            Ok(mut map) => map.remove(FAVORITES_STORAGE_KEY).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Favorites decode failed");
                Vec::new()
            }
        }
    }

    fn persist(&self, ids: &[String]) {
        let mut map = HashMap::new();
        map.insert(FAVORITES_STORAGE_KEY.to_string(), ids.to_vec());
        match serde_json::to_vec(&map) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(&self.path, bytes) {
                    tracing::warn!(path = %self.path.display(), error = %e, "Favorites write failed");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Favorites encode failed");
            }
        }
    }

    /// Returns all favorited ids in insertion order
    pub fn get_all(&self) -> Vec<String> {
        self.ids.lock().unwrap().clone()
    }

    /// Whether `id` is currently favorited
    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.lock().unwrap().iter().any(|fav| fav == id)
    }

    /// Adds `id` if not already present
    pub fn add(&self, id: &str) {
        let mut ids = self.ids.lock().unwrap();
        if !ids.iter().any(|fav| fav == id) {
            ids.push(id.to_string());
            self.persist(&ids);
        }
    }

    /// Removes `id` if present
    pub fn remove(&self, id: &str) {
        let mut ids = self.ids.lock().unwrap();
        if let Some(idx) = ids.iter().position(|fav| fav == id) {
            ids.remove(idx);
            self.persist(&ids);
        }
    }

    /// Flips the favorite status of `id`
    pub fn toggle(&self, id: &str) {
        if self.is_favorite(id) {
            self.remove(id);
        } else {
            self.add(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_remove_toggle_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoritesStore::new(dir.path());

        assert!(store.get_all().is_empty());

        store.add("bitcoin");
        store.add("ethereum");
        store.add("bitcoin"); // duplicate ignored
        assert_eq!(store.get_all(), vec!["bitcoin", "ethereum"]);
        assert!(store.is_favorite("bitcoin"));

        store.toggle("bitcoin");
        assert!(!store.is_favorite("bitcoin"));
        assert_eq!(store.get_all(), vec!["ethereum"]);

        store.toggle("solana");
        assert_eq!(store.get_all(), vec!["ethereum", "solana"]);
    }

    #[test]
    fn favorites_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FavoritesStore::new(dir.path());
            store.add("bitcoin");
            store.add("ethereum");
        }
        let reopened = FavoritesStore::new(dir.path());
        assert_eq!(reopened.get_all(), vec!["bitcoin", "ethereum"]);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoritesStore::new(dir.path());
        assert!(store.get_all().is_empty());
        assert!(!store.is_favorite("bitcoin"));
    }
}
