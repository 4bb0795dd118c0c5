//! # Crypto Tracker SDK
//!
//! List-state synchronization engines for cryptocurrency market data
//! from the public CoinGecko REST API: paginated browsing, remote and
//! local search, sorting and price filters, a persistent favorites
//! set, and offline fallback via a local snapshot cache.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use crypto_tracker_sdk::{
//!     constants::MAIN_LIST_CACHE_NAME, CoinGeckoGateway, ListSyncEngine, OfflineCache, SortMode,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Arc::new(CoinGeckoGateway::new()?);
//! let cache = OfflineCache::new("/tmp/crypto-tracker", MAIN_LIST_CACHE_NAME);
//! let engine = ListSyncEngine::new(gateway, cache);
//!
//! // show the last snapshot immediately, then refresh from the network
//! engine.initialize();
//! engine.fetch_page(true).await;
//!
//! engine.visible().subscribe(|coins| {
//!     for coin in coins {
//!         println!("{}: {:?}", coin.id, coin.current_price);
//!     }
//! });
//! engine.set_sort(SortMode::PriceDesc);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Presentation (commands)
//!     ↓
//! ListSyncEngine / FavoritesListSyncEngine / DetailSyncEngine
//!     ↓                        ↓                    ↓
//! MarketDataGateway      FavoritesStore       OfflineCache
//! (CoinGecko REST)       (key-value file)     (JSON snapshot)
//!     ↓
//! Published state (list, is_loading, last_error, is_offline)
//!     ↓
//! Presentation (re-render)
//! ```
//!
//! Each engine owns its state behind one lock; network calls run
//! asynchronously and writes are applied on completion, so a page
//! fetch already in flight silently drops concurrent requests instead
//! of queueing them.

pub mod cache;
pub mod constants;
pub mod debounce;
pub mod detail_engine;
pub mod error;
pub mod favorites;
pub mod favorites_engine;
pub mod gateway;
pub mod gateways;
pub mod list_engine;
pub mod published;
pub mod types;

// Re-export commonly used types
pub use cache::OfflineCache;
pub use detail_engine::DetailSyncEngine;
pub use error::NetworkError;
pub use favorites::FavoritesStore;
pub use favorites_engine::FavoritesListSyncEngine;
pub use gateway::MarketDataGateway;
pub use gateways::CoinGeckoGateway;
pub use list_engine::ListSyncEngine;
pub use published::{Published, SubscriptionId};
pub use types::{ChartPeriod, Coin, CoinSummary, PricePoint, SortMode};
