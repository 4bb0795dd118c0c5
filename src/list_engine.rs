//! List synchronization engine
//!
//! The core of the SDK: reconciles the paginated remote market list, a
//! local search/filter/sort projection, and the offline snapshot cache.
//! All engine state lives behind one lock and every mutation is
//! published through the reactive fields, so a rendering layer only
//! ever observes consistent transitions.

use crate::{
    cache::OfflineCache,
    constants::{DEFAULT_VS_CURRENCY, PAGE_SIZE, PREFETCH_THRESHOLD, SEARCH_DEBOUNCE_MS},
    debounce::Debouncer,
    error::NetworkError,
    gateway::MarketDataGateway,
    published::Published,
    types::{Coin, SortMode},
};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Internal mutable state of the list engine
struct ListState {
    /// De-duplicated, order-preserving backing list for this session
    coins: Vec<Coin>,
    /// 1-based cursor of the next page to request
    page: u32,
    /// False once a short page has signalled end-of-data
    has_more: bool,
    /// Single-flight guard; concurrent fetches are dropped, not queued
    in_flight: bool,
    /// Search text currently applied to the projection
    search_text: String,
    /// Last text submitted to the debouncer, for equal-value suppression
    pending_search: String,
    sort: SortMode,
    min_price: Option<f64>,
    max_price: Option<f64>,
    /// True while the backing list came from a remote search, in which
    /// case the text filter is not re-applied locally
    remote_results: bool,
}

struct ListCore {
    gateway: Arc<dyn MarketDataGateway>,
    cache: OfflineCache<Coin>,
    state: Mutex<ListState>,
    visible: Published<Vec<Coin>>,
    is_loading: Published<bool>,
    last_error: Published<Option<Arc<NetworkError>>>,
    is_offline: Published<bool>,
}

/// Engine owning the authoritative market list and its projection
///
/// Must be constructed inside a Tokio runtime: the search debouncer
/// runs on a spawned worker task.
pub struct ListSyncEngine {
    core: Arc<ListCore>,
    debouncer: Debouncer<String>,
}

impl ListSyncEngine {
    /// Creates an engine over the given gateway and snapshot cache
    pub fn new(gateway: Arc<dyn MarketDataGateway>, cache: OfflineCache<Coin>) -> Self {
        let core = Arc::new(ListCore {
            gateway,
            cache,
            state: Mutex::new(ListState {
                coins: Vec::new(),
                page: 1,
                has_more: true,
                in_flight: false,
                search_text: String::new(),
                pending_search: String::new(),
                sort: SortMode::Unsorted,
                min_price: None,
                max_price: None,
                remote_results: false,
            }),
            visible: Published::default(),
            is_loading: Published::new(false),
            last_error: Published::new(None),
            is_offline: Published::new(false),
        });

        let debounce_core = core.clone();
        let debouncer = Debouncer::spawn(Duration::from_millis(SEARCH_DEBOUNCE_MS), move |text| {
            debounce_core.commit_search_text(text);
        });

        Self { core, debouncer }
    }

    /// Seeds the list from the offline snapshot, if one exists
    ///
    /// Does not trigger any network call by itself.
    pub fn initialize(&self) {
        if let Some(cached) = self.core.cache.load() {
            tracing::debug!(count = cached.len(), "Seeding list from offline snapshot");
            self.core.state.lock().unwrap().coins = cached;
            self.core.is_offline.set(true);
            self.core.apply_projection();
        }
    }

    /// Fetches the next page, or restarts from page 1 when `reset`
    ///
    /// No-op while another fetch is in flight.
    pub async fn fetch_page(&self, reset: bool) {
        self.core.fetch_page(reset).await;
    }

    /// Prefetches the next page when `visible_index` nears the end
    ///
    /// Disabled while a local search filter is active; remote search
    /// replaces pagination entirely.
    pub async fn load_more_if_near(&self, visible_index: usize) {
        let should_fetch = {
            let state = self.core.state.lock().unwrap();
            let visible_len = self.core.visible.with(Vec::len);
            state.has_more
                && !state.in_flight
                && state.search_text.is_empty()
                && visible_index + PREFETCH_THRESHOLD >= visible_len
        };
        if should_fetch {
            self.core.fetch_page(false).await;
        }
    }

    /// Updates the search text; the projection recomputes only after
    /// the debounce window has elapsed without further input
    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let mut state = self.core.state.lock().unwrap();
            if state.pending_search == text {
                return;
            }
            state.pending_search = text.clone();
        }
        self.debouncer.submit(text);
    }

    /// Searches remotely by name, then fetches live prices for the hits
    ///
    /// Replaces the authoritative list; sort and price filters still
    /// apply to the result, the text filter does not.
    pub async fn search_remote(&self, query: &str) {
        self.core.search_remote(query).await;
    }

    /// Recomputes the visible list; pure and idempotent
    pub fn apply_projection(&self) {
        self.core.apply_projection();
    }

    /// Sets the sort applied to the visible list
    pub fn set_sort(&self, sort: SortMode) {
        self.core.state.lock().unwrap().sort = sort;
        self.core.apply_projection();
    }

    /// Sets the inclusive minimum-price filter
    pub fn set_min_price(&self, min: Option<f64>) {
        self.core.state.lock().unwrap().min_price = min;
        self.core.apply_projection();
    }

    /// Sets the inclusive maximum-price filter
    pub fn set_max_price(&self, max: Option<f64>) {
        self.core.state.lock().unwrap().max_price = max;
        self.core.apply_projection();
    }

    /// Filtered and sorted view of the authoritative list
    pub fn visible(&self) -> &Published<Vec<Coin>> {
        &self.core.visible
    }

    /// True while a page fetch or remote search is in flight
    pub fn is_loading(&self) -> &Published<bool> {
        &self.core.is_loading
    }

    /// Most recent fetch error, cleared when a new fetch starts
    pub fn last_error(&self) -> &Published<Option<Arc<NetworkError>>> {
        &self.core.last_error
    }

    /// True while the list is showing the offline snapshot
    pub fn is_offline(&self) -> &Published<bool> {
        &self.core.is_offline
    }
}

impl ListCore {
    async fn fetch_page(&self, reset: bool) {
        let page = {
            let mut state = self.state.lock().unwrap();
            if state.in_flight {
                tracing::debug!("Page fetch already in flight, dropping request");
                return;
            }
            state.in_flight = true;
            if reset {
                state.page = 1;
                state.has_more = true;
            }
            state.page
        };

        self.is_loading.set(true);
        self.last_error.set(None);

        match self.gateway.list_markets(page, PAGE_SIZE).await {
            Ok(coins) => {
                let count = coins.len();
                let snapshot = {
                    let mut state = self.state.lock().unwrap();
                    if page == 1 {
                        state.coins = coins;
                    } else {
                        merge_append(&mut state.coins, coins);
                    }
                    state.has_more = count == PAGE_SIZE;
                    if state.has_more {
                        state.page += 1;
                    }
                    state.remote_results = false;
                    state.in_flight = false;
                    // snapshot only the first page, not every increment
                    (page == 1).then(|| state.coins.clone())
                };
                tracing::debug!(page, count, "Fetched market page");
                self.is_offline.set(false);
                if let Some(snapshot) = &snapshot {
                    self.cache.save(snapshot);
                }
                self.apply_projection();
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "Page fetch failed");
                self.state.lock().unwrap().in_flight = false;
                // A failed first page of a fresh session falls back to
                // the offline snapshot; pagination state stays put so a
                // manual retry resumes correctly.
                if page == 1 {
                    if let Some(cached) = self.cache.load() {
                        self.state.lock().unwrap().coins = cached;
                        self.is_offline.set(true);
                        self.apply_projection();
                    }
                }
                self.last_error.set(Some(Arc::new(e)));
            }
        }

        self.is_loading.set(false);
    }

    async fn search_remote(&self, query: &str) {
        {
            let mut state = self.state.lock().unwrap();
            if state.in_flight {
                tracing::debug!("Fetch already in flight, dropping remote search");
                return;
            }
            state.in_flight = true;
        }

        self.is_loading.set(true);
        self.last_error.set(None);

        let outcome: Result<Vec<Coin>, NetworkError> = async {
            let summaries = self.gateway.search_by_name(query).await?;
            let ids: Vec<String> = summaries.into_iter().map(|s| s.id).collect();
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            self.gateway.list_by_ids(&ids, DEFAULT_VS_CURRENCY).await
        }
        .await;

        match outcome {
            Ok(coins) => {
                tracing::debug!(query, count = coins.len(), "Remote search finished");
                {
                    let mut state = self.state.lock().unwrap();
                    state.coins = coins;
                    state.remote_results = true;
                    state.in_flight = false;
                }
                self.is_offline.set(false);
                self.apply_projection();
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "Remote search failed");
                self.state.lock().unwrap().in_flight = false;
                self.last_error.set(Some(Arc::new(e)));
            }
        }

        self.is_loading.set(false);
    }

    /// Applies the settled search text and recomputes the projection
    fn commit_search_text(&self, text: String) {
        {
            let mut state = self.state.lock().unwrap();
            if state.search_text == text {
                return;
            }
            state.search_text = text;
            // typing locally ends the remote-search display mode
            state.remote_results = false;
        }
        self.apply_projection();
    }

    fn apply_projection(&self) {
        let visible = {
            let state = self.state.lock().unwrap();
            project(&state)
        };
        self.visible.set(visible);
    }
}

/// Appends `incoming` to `coins`, dropping entries whose id is already
/// present (first-seen wins; existing prices are not updated)
fn merge_append(coins: &mut Vec<Coin>, incoming: Vec<Coin>) {
    let seen: HashSet<String> = coins.iter().map(|c| c.id.clone()).collect();
    coins.extend(incoming.into_iter().filter(|c| !seen.contains(&c.id)));
}

/// Computes the visible list: text filter, price bounds, then sort
fn project(state: &ListState) -> Vec<Coin> {
    let needle = state.search_text.to_lowercase();
    let mut visible: Vec<Coin> = state
        .coins
        .iter()
        .filter(|coin| {
            if !needle.is_empty() && !state.remote_results {
                let name_hit = coin
                    .name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle));
                let symbol_hit = coin
                    .symbol
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle));
                if !name_hit && !symbol_hit {
                    return false;
                }
            }
            if let Some(min) = state.min_price {
                if !coin.current_price.is_some_and(|p| p >= min) {
                    return false;
                }
            }
            if let Some(max) = state.max_price {
                if !coin.current_price.is_some_and(|p| p <= max) {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect();

    match state.sort {
        SortMode::Unsorted => {}
        SortMode::NameAsc => visible.sort_by(|a, b| name_of(a).cmp(name_of(b))),
        SortMode::NameDesc => visible.sort_by(|a, b| name_of(b).cmp(name_of(a))),
        SortMode::PriceAsc => visible.sort_by(|a, b| cmp_price(a, b)),
        SortMode::PriceDesc => visible.sort_by(|a, b| cmp_price(b, a)),
    }
    visible
}

fn name_of(coin: &Coin) -> &str {
    coin.name.as_deref().unwrap_or("")
}

fn cmp_price(a: &Coin, b: &Coin) -> Ordering {
    let pa = a.current_price.unwrap_or(0.0);
    let pb = b.current_price.unwrap_or(0.0);
    pa.partial_cmp(&pb).unwrap_or(Ordering::Equal)
}
