//! Constants for the crypto tracker SDK
//!
//! All configuration for the tracker is centralized here.
//! No runtime configuration is used - the system operates with these
//! compile-time constants.

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Quote currency used for all price queries
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Number of entries requested per market page
pub const PAGE_SIZE: usize = 50;

/// How close to the end of the visible list an item must be before the
/// next page is prefetched
pub const PREFETCH_THRESHOLD: usize = 10;

/// Quiet window after the last keystroke before the search projection
/// is recomputed (in milliseconds)
pub const SEARCH_DEBOUNCE_MS: u64 = 200;

/// HTTP request timeout when talking to the API (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "crypto-tracker-sdk/0.1.0";

/// Key under which the favorite coin ids are persisted
pub const FAVORITES_STORAGE_KEY: &str = "favorite_crypto_ids";

/// File name (without extension) of the main list offline snapshot
pub const MAIN_LIST_CACHE_NAME: &str = "crypto_list_cache";

/// File name (without extension) of the favorites offline snapshot
pub const FAVORITES_CACHE_NAME: &str = "favorites_cache";
