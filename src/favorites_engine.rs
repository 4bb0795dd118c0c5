//! Favorites list synchronization engine
//!
//! Same shape as the main list engine but sourced from the persisted
//! favorites set instead of pagination: a pure refresh operation, safe
//! to call on every screen activation.

use crate::{
    cache::OfflineCache,
    constants::DEFAULT_VS_CURRENCY,
    error::NetworkError,
    favorites::FavoritesStore,
    gateway::MarketDataGateway,
    published::Published,
    types::Coin,
};
use std::sync::{Arc, Mutex};

/// Engine owning the favorites list
pub struct FavoritesListSyncEngine {
    gateway: Arc<dyn MarketDataGateway>,
    favorites: Arc<FavoritesStore>,
    cache: OfflineCache<Coin>,
    in_flight: Mutex<bool>,
    list: Published<Vec<Coin>>,
    is_loading: Published<bool>,
    last_error: Published<Option<Arc<NetworkError>>>,
    is_offline: Published<bool>,
}

impl FavoritesListSyncEngine {
    /// Creates the engine, eagerly seeding from the offline snapshot
    pub fn new(
        gateway: Arc<dyn MarketDataGateway>,
        favorites: Arc<FavoritesStore>,
        cache: OfflineCache<Coin>,
    ) -> Self {
        let engine = Self {
            gateway,
            favorites,
            cache,
            in_flight: Mutex::new(false),
            list: Published::default(),
            is_loading: Published::new(false),
            last_error: Published::new(None),
            is_offline: Published::new(false),
        };
        if let Some(cached) = engine.cache.load() {
            tracing::debug!(count = cached.len(), "Seeding favorites from offline snapshot");
            engine.list.set(cached);
            engine.is_offline.set(true);
        }
        engine
    }

    /// Refreshes live records for the currently favorited ids
    ///
    /// An explicitly empty favorites set is authoritative: it clears
    /// the list and the snapshot without touching the network.
    pub async fn fetch_favorites(&self) {
        let ids = self.favorites.get_all();
        if ids.is_empty() {
            self.list.set(Vec::new());
            self.is_offline.set(false);
            self.cache.clear();
            return;
        }

        {
            let mut in_flight = self.in_flight.lock().unwrap();
            if *in_flight {
                tracing::debug!("Favorites fetch already in flight, dropping request");
                return;
            }
            *in_flight = true;
        }

        self.is_loading.set(true);
        self.last_error.set(None);

        match self.gateway.list_by_ids(&ids, DEFAULT_VS_CURRENCY).await {
            Ok(coins) => {
                tracing::debug!(count = coins.len(), "Fetched favorites");
                self.cache.save(&coins);
                self.list.set(coins);
                self.is_offline.set(false);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Favorites fetch failed");
                if let Some(cached) = self.cache.load() {
                    self.list.set(cached);
                    self.is_offline.set(true);
                }
                self.last_error.set(Some(Arc::new(e)));
            }
        }

        *self.in_flight.lock().unwrap() = false;
        self.is_loading.set(false);
    }

    /// Live records for the favorited ids
    pub fn list(&self) -> &Published<Vec<Coin>> {
        &self.list
    }

    /// True while a refresh is in flight
    pub fn is_loading(&self) -> &Published<bool> {
        &self.is_loading
    }

    /// Most recent fetch error, cleared when a refresh starts
    pub fn last_error(&self) -> &Published<Option<Arc<NetworkError>>> {
        &self.last_error
    }

    /// True while the list is showing the offline snapshot
    pub fn is_offline(&self) -> &Published<bool> {
        &self.is_offline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FAVORITES_CACHE_NAME;
    use crate::gateway::mock::MockGateway;

    fn coin(id: &str, price: f64) -> Coin {
        Coin {
            current_price: Some(price),
            ..Coin::with_id(id)
        }
    }

    fn engine_with(
        gateway: Arc<MockGateway>,
        dir: &std::path::Path,
        favorite_ids: &[&str],
    ) -> FavoritesListSyncEngine {
        let favorites = Arc::new(FavoritesStore::new(dir));
        for id in favorite_ids {
            favorites.add(id);
        }
        FavoritesListSyncEngine::new(gateway, favorites, OfflineCache::new(dir, FAVORITES_CACHE_NAME))
    }

    #[tokio::test]
    async fn refresh_fetches_live_records_and_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.set_by_ids(vec![coin("bitcoin", 50000.0), coin("ethereum", 3000.0)]);

        let engine = engine_with(gateway.clone(), dir.path(), &["bitcoin", "ethereum"]);
        engine.fetch_favorites().await;

        assert_eq!(engine.list().with(Vec::len), 2);
        assert!(!engine.is_offline().get());
        assert!(!engine.is_loading().get());

        let snapshot: OfflineCache<Coin> = OfflineCache::new(dir.path(), FAVORITES_CACHE_NAME);
        assert_eq!(snapshot.load().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_favorites_clear_list_and_snapshot_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot: OfflineCache<Coin> = OfflineCache::new(dir.path(), FAVORITES_CACHE_NAME);
        snapshot.save(&[coin("bitcoin", 50000.0)]);

        let gateway = Arc::new(MockGateway::new());
        gateway.fail_by_ids(NetworkError::Unknown);

        let engine = engine_with(gateway.clone(), dir.path(), &[]);
        engine.fetch_favorites().await;

        assert!(engine.list().with(Vec::is_empty));
        assert!(snapshot.load().is_none());
        assert_eq!(gateway.call_count("list_by_ids"), 0);
    }

    #[tokio::test]
    async fn failed_refresh_falls_back_to_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot: OfflineCache<Coin> = OfflineCache::new(dir.path(), FAVORITES_CACHE_NAME);
        snapshot.save(&[coin("bitcoin", 48000.0)]);

        let gateway = Arc::new(MockGateway::new());
        gateway.fail_by_ids(NetworkError::Unknown);

        let engine = engine_with(gateway, dir.path(), &["bitcoin"]);
        engine.fetch_favorites().await;

        assert!(engine.is_offline().get());
        assert_eq!(engine.list().with(Vec::len), 1);
        assert!(engine.last_error().with(Option::is_some));
    }

    #[tokio::test]
    async fn construction_seeds_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot: OfflineCache<Coin> = OfflineCache::new(dir.path(), FAVORITES_CACHE_NAME);
        snapshot.save(&[coin("ethereum", 3000.0)]);

        let gateway = Arc::new(MockGateway::new());
        let engine = engine_with(gateway, dir.path(), &["ethereum"]);

        assert!(engine.is_offline().get());
        assert_eq!(engine.list().with(Vec::len), 1);
    }

    #[tokio::test]
    async fn repeated_refresh_latest_response_wins() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.set_by_ids(vec![coin("bitcoin", 50000.0)]);

        let engine = engine_with(gateway.clone(), dir.path(), &["bitcoin"]);
        engine.fetch_favorites().await;

        gateway.set_by_ids(vec![coin("bitcoin", 51000.0)]);
        engine.fetch_favorites().await;

        let price = engine.list().with(|l| l[0].current_price);
        assert_eq!(price, Some(51000.0));
    }
}
