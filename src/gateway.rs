//! Gateway abstraction for fetching market data from the REST API

use crate::{
    error::NetworkError,
    types::{Coin, CoinSummary, PricePoint},
};
use async_trait::async_trait;

/// Trait for market data gateways
///
/// Implementations perform typed HTTP GET + JSON decode for the five
/// endpoints the engines consume. Pure request/response; no state.
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Fetches one page of market records ordered by market cap
    ///
    /// # Arguments
    /// * `page` - 1-based page cursor
    /// * `per_page` - fixed page size; a shorter result signals end-of-data
    async fn list_markets(&self, page: u32, per_page: usize) -> Result<Vec<Coin>, NetworkError>;

    /// Searches coins by name, returning summaries without live prices
    async fn search_by_name(&self, query: &str) -> Result<Vec<CoinSummary>, NetworkError>;

    /// Fetches full market records for a specific set of ids
    async fn list_by_ids(&self, ids: &[String], vs_currency: &str)
        -> Result<Vec<Coin>, NetworkError>;

    /// Fetches the historical price series for one coin
    ///
    /// # Arguments
    /// * `id` - coin identifier
    /// * `days` - window length in days (1 / 7 / 30)
    async fn chart_series(&self, id: &str, days: u32) -> Result<Vec<PricePoint>, NetworkError>;

    /// Fetches the extended detail record for one coin
    async fn coin_detail(&self, id: &str) -> Result<Coin, NetworkError>;
}
