//! CoinGecko market data gateway implementation

use crate::{
    constants::{COINGECKO_API_URL, DEFAULT_VS_CURRENCY, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::NetworkError,
    gateway::MarketDataGateway,
    types::{Coin, CoinDetailResponse, CoinSummary, MarketChartResponse, PricePoint, SearchResponse},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// CoinGecko REST gateway
pub struct CoinGeckoGateway {
    client: Client,
    base_url: String,
}

impl CoinGeckoGateway {
    /// Creates a new gateway against the public CoinGecko API
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Creates a gateway against a custom base URL (proxies, test servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(NetworkError::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn markets_url(&self, page: u32, per_page: usize) -> String {
        format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page={}&sparkline=false",
            self.base_url, DEFAULT_VS_CURRENCY, per_page, page
        )
    }

    fn by_ids_url(&self, ids: &[String], vs_currency: &str) -> String {
        format!(
            "{}/coins/markets?vs_currency={}&ids={}&order=market_cap_desc",
            self.base_url,
            vs_currency,
            ids.join(",")
        )
    }

    fn chart_url(&self, id: &str, days: u32) -> String {
        format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}",
            self.base_url, id, DEFAULT_VS_CURRENCY, days
        )
    }

    fn detail_url(&self, id: &str) -> String {
        format!(
            "{}/coins/{}?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false",
            self.base_url, id
        )
    }

    /// Performs a GET and decodes the JSON body into `T`
    ///
    /// Classifies failures per the error taxonomy: transport errors wrap
    /// the reqwest error, decode mismatches carry the serde message, and
    /// non-success statuses map to `Unknown` after logging.
    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, NetworkError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| NetworkError::invalid_request(format!("{url}: {e}")))?;

        tracing::debug!(url = %parsed, "Fetching from CoinGecko");

        let mut request = self.client.get(parsed);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(NetworkError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, url = %url, "CoinGecko returned an error status");
            return Err(NetworkError::Unknown);
        }

        let body = response.text().await.map_err(NetworkError::Transport)?;
        serde_json::from_str(&body).map_err(|e| NetworkError::decode_failure(e.to_string()))
    }
}

#[async_trait]
impl MarketDataGateway for CoinGeckoGateway {
    async fn list_markets(&self, page: u32, per_page: usize) -> Result<Vec<Coin>, NetworkError> {
        if page == 0 {
            return Err(NetworkError::invalid_request("page cursor starts at 1"));
        }
        self.fetch(&self.markets_url(page, per_page), &[]).await
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<CoinSummary>, NetworkError> {
        if query.trim().is_empty() {
            return Err(NetworkError::invalid_request("empty search query"));
        }
        let url = format!("{}/search", self.base_url);
        let response: SearchResponse = self.fetch(&url, &[("query", query)]).await?;
        Ok(response.coins)
    }

    async fn list_by_ids(
        &self,
        ids: &[String],
        vs_currency: &str,
    ) -> Result<Vec<Coin>, NetworkError> {
        if ids.is_empty() {
            return Err(NetworkError::invalid_request("empty id list"));
        }
        self.fetch(&self.by_ids_url(ids, vs_currency), &[]).await
    }

    async fn chart_series(&self, id: &str, days: u32) -> Result<Vec<PricePoint>, NetworkError> {
        if id.is_empty() {
            return Err(NetworkError::invalid_request("empty coin id"));
        }
        let response: MarketChartResponse = self.fetch(&self.chart_url(id, days), &[]).await?;
        Ok(response.into_points())
    }

    async fn coin_detail(&self, id: &str) -> Result<Coin, NetworkError> {
        if id.is_empty() {
            return Err(NetworkError::invalid_request("empty coin id"));
        }
        let response: CoinDetailResponse = self.fetch(&self.detail_url(id), &[]).await?;
        Ok(response.into_coin())
    }
}
