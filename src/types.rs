//! Types for the crypto tracker
//!
//! Wire models mirror the CoinGecko REST shapes. Optional fields stay
//! `None` when the API omits them - zero and "no data" are distinct.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cryptocurrency's market record
///
/// Identity for de-duplication is `id` only; every other field may
/// legitimately change between fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    /// Stable unique identifier ("bitcoin", "ethereum", ...)
    pub id: String,
    /// Display name
    pub name: Option<String>,
    /// Ticker symbol
    pub symbol: Option<String>,
    /// Icon URL
    pub image: Option<String>,
    /// Current price in the quote currency
    pub current_price: Option<f64>,
    /// Market capitalization
    pub market_cap: Option<f64>,
    /// Rank by market capitalization
    pub market_cap_rank: Option<u32>,
    /// 24h trading volume
    pub total_volume: Option<f64>,
    /// Circulating supply
    pub circulating_supply: Option<f64>,
    /// Maximum supply
    pub max_supply: Option<f64>,
    /// 24h low
    pub low_24h: Option<f64>,
    /// 24h high
    pub high_24h: Option<f64>,
}

impl Coin {
    /// Creates a minimal record with only the identity set
    ///
    /// Primarily for tests and for seeding a detail engine before the
    /// full record has been fetched.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            symbol: None,
            image: None,
            current_price: None,
            market_cap: None,
            market_cap_rank: None,
            total_volume: None,
            circulating_supply: None,
            max_supply: None,
            low_24h: None,
            high_24h: None,
        }
    }
}

/// Summary entry returned by the `/search` endpoint
///
/// Carries no live price; a follow-up batch-by-ids fetch is needed for
/// full market records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinSummary {
    /// Stable unique identifier
    pub id: String,
    /// Display name
    pub name: Option<String>,
    /// Ticker symbol
    pub symbol: Option<String>,
    /// Small icon URL
    pub thumb: Option<String>,
    /// Large icon URL
    pub large: Option<String>,
    /// Rank by market capitalization
    pub market_cap_rank: Option<u32>,
}

/// Envelope of the `/search` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Matching coins, best match first
    pub coins: Vec<CoinSummary>,
}

/// Raw envelope of the `/coins/{id}/market_chart` endpoint
///
/// Each sample is a `[millisecond timestamp, price]` pair.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChartResponse {
    /// Price samples, oldest first
    pub prices: Vec<[f64; 2]>,
}

/// One decoded chart sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Sample time
    pub timestamp: DateTime<Utc>,
    /// Price in the quote currency
    pub price: f64,
}

impl MarketChartResponse {
    /// Converts the raw millisecond samples into price points
    ///
    /// Samples with an out-of-range timestamp are skipped.
    pub fn into_points(self) -> Vec<PricePoint> {
        self.prices
            .into_iter()
            .filter_map(|[ms, price]| {
                DateTime::<Utc>::from_timestamp_millis(ms as i64)
                    .map(|timestamp| PricePoint { timestamp, price })
            })
            .collect()
    }
}

/// Per-currency value map inside the detail response ("usd" -> value)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrencyValue {
    /// Value quoted in USD
    pub usd: Option<f64>,
}

/// Icon URLs inside the detail response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailImage {
    /// Large icon URL
    pub large: Option<String>,
}

/// `market_data` block of the `/coins/{id}` endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailMarketData {
    /// Current price per currency
    #[serde(default)]
    pub current_price: CurrencyValue,
    /// Market capitalization per currency
    #[serde(default)]
    pub market_cap: CurrencyValue,
    /// 24h volume per currency
    #[serde(default)]
    pub total_volume: CurrencyValue,
    /// 24h low per currency
    #[serde(default)]
    pub low_24h: CurrencyValue,
    /// 24h high per currency
    #[serde(default)]
    pub high_24h: CurrencyValue,
    /// Circulating supply
    pub circulating_supply: Option<f64>,
    /// Maximum supply
    pub max_supply: Option<f64>,
}

/// Raw envelope of the `/coins/{id}` detail endpoint
///
/// Unlike `/coins/markets`, the detail endpoint nests prices under
/// `market_data` and keys them by currency. The gateway flattens this
/// into a plain [`Coin`] so the engines only ever see one shape.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinDetailResponse {
    /// Stable unique identifier
    pub id: String,
    /// Display name
    pub name: Option<String>,
    /// Ticker symbol
    pub symbol: Option<String>,
    /// Icon URLs
    #[serde(default)]
    pub image: DetailImage,
    /// Rank by market capitalization
    pub market_cap_rank: Option<u32>,
    /// Nested market figures
    #[serde(default)]
    pub market_data: DetailMarketData,
}

impl CoinDetailResponse {
    /// Flattens the nested detail shape into a market record
    pub fn into_coin(self) -> Coin {
        Coin {
            id: self.id,
            name: self.name,
            symbol: self.symbol,
            image: self.image.large,
            current_price: self.market_data.current_price.usd,
            market_cap: self.market_data.market_cap.usd,
            market_cap_rank: self.market_cap_rank,
            total_volume: self.market_data.total_volume.usd,
            circulating_supply: self.market_data.circulating_supply,
            max_supply: self.market_data.max_supply,
            low_24h: self.market_data.low_24h.usd,
            high_24h: self.market_data.high_24h.usd,
        }
    }
}

/// Sort applied to the visible list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Keep the authoritative order
    #[default]
    Unsorted,
    /// Name A-Z (missing name sorts as empty string)
    NameAsc,
    /// Name Z-A
    NameDesc,
    /// Cheapest first (missing price treated as 0)
    PriceAsc,
    /// Most expensive first
    PriceDesc,
}

/// Historical chart window selectable on the detail screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartPeriod {
    /// Last 24 hours
    #[default]
    Day,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
}

impl ChartPeriod {
    /// Day count passed to the chart endpoint
    pub fn days(self) -> u32 {
        match self {
            ChartPeriod::Day => 1,
            ChartPeriod::Week => 7,
            ChartPeriod::Month => 30,
        }
    }

    /// Short label for presentation ("1D" / "1W" / "1M")
    pub fn label(self) -> &'static str {
        match self {
            ChartPeriod::Day => "1D",
            ChartPeriod::Week => "1W",
            ChartPeriod::Month => "1M",
        }
    }

    /// All selectable periods, in display order
    pub fn all() -> &'static [ChartPeriod] {
        &[ChartPeriod::Day, ChartPeriod::Week, ChartPeriod::Month]
    }
}
