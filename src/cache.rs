//! Offline snapshot cache
//!
//! Persists a named list of entities as a JSON blob on disk so the last
//! successfully fetched list can be shown when the network is down.
//! Last-write-wins, no versioning. Cache I/O is best-effort: failures
//! are logged and swallowed, and a failed load is indistinguishable
//! from an absent cache.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

/// JSON blob file cache for one logical list
///
/// One instance per list; the main list cache and the favorites cache
/// are independent named caches in the same directory.
pub struct OfflineCache<T> {
    path: PathBuf,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> OfflineCache<T> {
    /// Creates a cache stored as `{dir}/{name}.json`
    pub fn new(dir: impl Into<PathBuf>, name: &str) -> Self {
        Self {
            path: dir.into().join(format!("{name}.json")),
            _entity: PhantomData,
        }
    }

    /// Writes the snapshot atomically (temp file + rename)
    pub fn save(&self, items: &[T]) {
        let bytes = match serde_json::to_vec(items) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Cache encode failed");
                return;
            }
        };
        let tmp = self.path.with_extension("json.tmp");
        if let Err(e) = std::fs::write(&tmp, &bytes) {
            tracing::warn!(path = %tmp.display(), error = %e, "Cache write failed");
            return;
        }
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "Cache rename failed");
        }
    }

    /// Loads the snapshot, or `None` if absent or unreadable
    pub fn load(&self) -> Option<Vec<T>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "Cache read failed");
                }
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Cache decode failed");
                None
            }
        }
    }

    /// Deletes the snapshot file
    pub fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Cache clear failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coin;

    fn coin(id: &str, price: f64) -> Coin {
        Coin {
            current_price: Some(price),
            ..Coin::with_id(id)
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache: OfflineCache<Coin> = OfflineCache::new(dir.path(), "list");

        cache.save(&[coin("btc", 50000.0), coin("eth", 3000.0)]);
        let loaded = cache.load().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "btc");
        assert_eq!(loaded[1].current_price, Some(3000.0));
    }

    #[test]
    fn load_of_absent_cache_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache: OfflineCache<Coin> = OfflineCache::new(dir.path(), "missing");
        assert!(cache.load().is_none());
    }

    #[test]
    fn corrupt_cache_loads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache: OfflineCache<Coin> = OfflineCache::new(dir.path(), "bad");
        std::fs::write(dir.path().join("bad.json"), b"not json at all").unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn clear_removes_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache: OfflineCache<Coin> = OfflineCache::new(dir.path(), "list");

        cache.save(&[coin("btc", 50000.0)]);
        assert!(cache.load().is_some());

        cache.clear();
        assert!(cache.load().is_none());
        // clearing twice is harmless
        cache.clear();
    }
}
