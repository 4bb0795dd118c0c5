//! Per-coin detail synchronization engine
//!
//! Manages the fetch of the extended detail record and the historical
//! price series for a selectable time window. The engine is seeded
//! with the summary record already held by a list, so the detail
//! screen renders immediately and upgrades in place.

use crate::{
    error::NetworkError,
    favorites::FavoritesStore,
    gateway::MarketDataGateway,
    published::Published,
    types::{ChartPeriod, Coin, PricePoint},
};
use std::sync::{Arc, Mutex};

/// Engine for one selected coin
pub struct DetailSyncEngine {
    gateway: Arc<dyn MarketDataGateway>,
    favorites: Arc<FavoritesStore>,
    coin_id: String,
    selected_period: Mutex<ChartPeriod>,
    entity: Published<Coin>,
    price_series: Published<Vec<PricePoint>>,
    is_loading: Published<bool>,
    last_error: Published<Option<Arc<NetworkError>>>,
    is_favorite: Published<bool>,
}

impl DetailSyncEngine {
    /// Creates the engine seeded with a summary record
    pub fn new(
        seed: Coin,
        gateway: Arc<dyn MarketDataGateway>,
        favorites: Arc<FavoritesStore>,
    ) -> Self {
        let coin_id = seed.id.clone();
        let is_favorite = favorites.is_favorite(&coin_id);
        Self {
            gateway,
            favorites,
            coin_id,
            selected_period: Mutex::new(ChartPeriod::default()),
            entity: Published::new(seed),
            price_series: Published::default(),
            is_loading: Published::new(false),
            last_error: Published::new(None),
            is_favorite: Published::new(is_favorite),
        }
    }

    /// Fetches the full detail record, replacing the summary on success
    ///
    /// On failure the summary stays in place - partial data beats none.
    pub async fn load_details(&self) {
        self.is_loading.set(true);
        self.last_error.set(None);

        match self.gateway.coin_detail(&self.coin_id).await {
            Ok(detail) => {
                self.entity.set(detail);
            }
            Err(e) => {
                tracing::warn!(coin = %self.coin_id, error = %e, "Detail fetch failed");
                self.last_error.set(Some(Arc::new(e)));
            }
        }

        self.is_loading.set(false);
    }

    /// Fetches the price series for the given window
    ///
    /// Switching windows supersedes earlier requests: a late-arriving
    /// response for a window that is no longer selected is discarded.
    pub async fn load_history(&self, period: ChartPeriod) {
        *self.selected_period.lock().unwrap() = period;
        self.is_loading.set(true);
        self.last_error.set(None);

        let result = self.gateway.chart_series(&self.coin_id, period.days()).await;

        let still_selected = *self.selected_period.lock().unwrap() == period;
        if !still_selected {
            tracing::debug!(coin = %self.coin_id, window = period.label(), "Discarding stale chart response");
            return;
        }

        match result {
            Ok(points) => {
                self.price_series.set(points);
            }
            Err(e) => {
                tracing::warn!(coin = %self.coin_id, window = period.label(), error = %e, "Chart fetch failed");
                self.last_error.set(Some(Arc::new(e)));
            }
        }

        self.is_loading.set(false);
    }

    /// Flips the persisted favorite flag for this coin
    pub fn toggle_favorite(&self) {
        self.favorites.toggle(&self.coin_id);
        self.is_favorite.set(self.favorites.is_favorite(&self.coin_id));
    }

    /// The currently selected chart window
    pub fn selected_period(&self) -> ChartPeriod {
        *self.selected_period.lock().unwrap()
    }

    /// Summary record, upgraded to the full detail record once fetched
    pub fn entity(&self) -> &Published<Coin> {
        &self.entity
    }

    /// Price series for the selected window, oldest first
    pub fn price_series(&self) -> &Published<Vec<PricePoint>> {
        &self.price_series
    }

    /// True while a detail or chart fetch is in flight
    pub fn is_loading(&self) -> &Published<bool> {
        &self.is_loading
    }

    /// Most recent fetch error, cleared when a new fetch starts
    pub fn last_error(&self) -> &Published<Option<Arc<NetworkError>>> {
        &self.last_error
    }

    /// Persisted favorite status of this coin
    pub fn is_favorite(&self) -> &Published<bool> {
        &self.is_favorite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use chrono::DateTime;
    use std::time::Duration;

    fn seed() -> Coin {
        Coin {
            name: Some("Bitcoin".to_string()),
            symbol: Some("btc".to_string()),
            current_price: Some(50000.0),
            ..Coin::with_id("bitcoin")
        }
    }

    fn point(secs: i64, price: f64) -> PricePoint {
        PricePoint {
            timestamp: DateTime::from_timestamp(secs, 0).unwrap(),
            price,
        }
    }

    fn engine_with(gateway: Arc<MockGateway>, dir: &std::path::Path) -> DetailSyncEngine {
        DetailSyncEngine::new(seed(), gateway, Arc::new(FavoritesStore::new(dir)))
    }

    #[tokio::test]
    async fn details_replace_the_seeded_summary() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.set_detail(Coin {
            name: Some("Bitcoin".to_string()),
            market_cap: Some(980_000_000_000.0),
            market_cap_rank: Some(1),
            ..seed()
        });

        let engine = engine_with(gateway, dir.path());
        engine.load_details().await;

        assert_eq!(engine.entity().with(|c| c.market_cap_rank), Some(1));
        assert!(!engine.is_loading().get());
    }

    #[tokio::test]
    async fn failed_details_keep_the_summary() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.fail_detail(NetworkError::Unknown);

        let engine = engine_with(gateway, dir.path());
        engine.load_details().await;

        assert_eq!(engine.entity().with(|c| c.current_price), Some(50000.0));
        assert!(engine.last_error().with(Option::is_some));
    }

    #[tokio::test]
    async fn history_loads_for_the_selected_window() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.set_chart(7, vec![point(1_700_000_000, 42.0), point(1_700_000_060, 43.0)]);

        let engine = engine_with(gateway, dir.path());
        engine.load_history(ChartPeriod::Week).await;

        assert_eq!(engine.selected_period(), ChartPeriod::Week);
        assert_eq!(engine.price_series().with(Vec::len), 2);
    }

    #[tokio::test]
    async fn failed_history_leaves_prior_series() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.set_chart(1, vec![point(1_700_000_000, 42.0)]);

        let engine = engine_with(gateway.clone(), dir.path());
        engine.load_history(ChartPeriod::Day).await;
        assert_eq!(engine.price_series().with(Vec::len), 1);

        gateway.fail_chart(30, NetworkError::Unknown);
        engine.load_history(ChartPeriod::Month).await;

        assert_eq!(engine.price_series().with(Vec::len), 1);
        assert!(engine.last_error().with(Option::is_some));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_chart_response_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.set_chart(1, vec![point(1_700_000_000, 41.0)]);
        gateway.set_chart(7, vec![point(1_700_000_000, 42.0), point(1_700_000_060, 43.0)]);
        gateway.set_chart_delay(1, Duration::from_millis(100));

        let engine = Arc::new(engine_with(gateway, dir.path()));
        let slow = engine.clone();
        let day_fetch = tokio::spawn(async move { slow.load_history(ChartPeriod::Day).await });
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        // window changes before the 1-day response lands
        engine.load_history(ChartPeriod::Week).await;
        day_fetch.await.unwrap();

        assert_eq!(engine.selected_period(), ChartPeriod::Week);
        assert_eq!(engine.price_series().with(Vec::len), 2);
    }

    #[tokio::test]
    async fn toggle_favorite_persists_and_republishes() {
        let dir = tempfile::tempdir().unwrap();
        let favorites = Arc::new(FavoritesStore::new(dir.path()));
        let engine = DetailSyncEngine::new(seed(), Arc::new(MockGateway::new()), favorites.clone());

        assert!(!engine.is_favorite().get());
        engine.toggle_favorite();
        assert!(engine.is_favorite().get());
        assert!(favorites.is_favorite("bitcoin"));
        engine.toggle_favorite();
        assert!(!engine.is_favorite().get());
    }
}
