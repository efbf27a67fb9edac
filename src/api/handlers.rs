//! API Handlers
//!
//! One handler per country endpoint. Each derives a cache key, answers from
//! the cache when it can, and otherwise fetches from upstream, reshapes the
//! payload, stores it, and returns it.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;

use super::validation::{
    CompareParams, CountryCodePath, SearchParams, ValidatedPath, ValidatedQuery,
    COMPARE_COUNT_MESSAGE,
};
use crate::cache::{CacheKey, Endpoint, ResponseCache};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::country::{parse_country_list, parse_single_country};
use crate::models::{
    paginate, CountryComparison, CountryDetail, CountrySummary, Filters, HealthResponse,
    RawCountry, RegionCountry, SearchCriteria, StatsResponse,
};
use crate::upstream::{RestCountriesClient, UpstreamApi};

/// Upstream fields needed for the list, search, and filter responses.
const LIST_FIELDS: &str = "name,flags,region,capital,timezones,cca3";
const REGION_FIELDS: &str = "name,flags,region";
const FILTER_FIELDS: &str = "region,timezones";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide response cache
    pub cache: Arc<RwLock<ResponseCache>>,
    /// Source of raw country data
    pub upstream: Arc<dyn UpstreamApi>,
}

impl AppState {
    /// Creates a new AppState around the given cache and upstream.
    pub fn new(cache: ResponseCache, upstream: Arc<dyn UpstreamApi>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            upstream,
        }
    }

    /// Creates a new AppState from configuration, talking to the real API.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = RestCountriesClient::new(config.upstream_url.clone(), config.upstream_timeout())
            .context("failed to build upstream HTTP client")?;
        let cache = ResponseCache::new(config.cache_ttl());
        Ok(Self::new(cache, Arc::new(client)))
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its result.
    ///
    /// `fetch` is only polled on a miss. The cache lock is not held while it
    /// runs, so concurrent misses on one key may each fetch; the last store wins.
    async fn read_through<F>(&self, key: CacheKey, fetch: F) -> anyhow::Result<Value>
    where
        F: Future<Output = anyhow::Result<Value>>,
    {
        let cached = self.cache.write().await.get(&key);
        if let Some(value) = cached {
            return Ok(value);
        }

        let value = fetch.await?;
        self.cache.write().await.set(key, value.clone(), None);
        Ok(value)
    }
}

/// Maps a handler outcome to a response, hiding failure details behind `message`.
fn respond(result: anyhow::Result<Value>, message: &'static str) -> Result<Json<Value>> {
    result.map(Json).map_err(|e| ApiError::internal(message, e))
}

async fn fetch_country(upstream: &dyn UpstreamApi, code: &str) -> anyhow::Result<RawCountry> {
    let payload = upstream
        .get(&["alpha", code], &[])
        .await
        .with_context(|| format!("fetching country {code}"))?;
    parse_single_country(payload)
}

async fn fetch_all(upstream: &dyn UpstreamApi, fields: &str) -> anyhow::Result<Vec<RawCountry>> {
    let payload = upstream
        .get(&["all"], &[("fields", fields)])
        .await
        .context("fetching all countries")?;
    parse_country_list(payload)
}

/// Handler for GET /api/countries
pub async fn list_countries(State(state): State<AppState>) -> Result<Json<Value>> {
    let key = CacheKey::new(Endpoint::AllCountries);
    let result = state
        .read_through(key, load_all_countries(state.upstream.as_ref()))
        .await;

    respond(result, "Error fetching countries.")
}

async fn load_all_countries(upstream: &dyn UpstreamApi) -> anyhow::Result<Value> {
    let countries = fetch_all(upstream, LIST_FIELDS).await?;
    let summaries: Vec<CountrySummary> = countries.iter().map(CountrySummary::from).collect();
    Ok(serde_json::to_value(summaries)?)
}

/// Handler for GET /api/countries/:code
pub async fn country_by_code(
    State(state): State<AppState>,
    ValidatedPath(path): ValidatedPath<CountryCodePath>,
) -> Result<Json<Value>> {
    let code = path.code.to_uppercase();
    let key = CacheKey::with_params(Endpoint::Country, [("code", code.as_str())]);
    let result = state
        .read_through(key, load_country_detail(state.upstream.as_ref(), &code))
        .await;

    respond(result, "Error fetching country details.")
}

async fn load_country_detail(upstream: &dyn UpstreamApi, code: &str) -> anyhow::Result<Value> {
    let country = fetch_country(upstream, code).await?;
    Ok(serde_json::to_value(CountryDetail::from(&country))?)
}

/// Handler for GET /api/countries/region/:region
pub async fn countries_by_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<Value>> {
    let key = CacheKey::with_params(Endpoint::Region, [("region", region.to_lowercase())]);
    let result = state
        .read_through(key, load_region(state.upstream.as_ref(), &region))
        .await;

    respond(result, "Error fetching countries by region.")
}

async fn load_region(upstream: &dyn UpstreamApi, region: &str) -> anyhow::Result<Value> {
    let payload = upstream
        .get(&["region", region], &[("fields", REGION_FIELDS)])
        .await
        .with_context(|| format!("fetching region {region}"))?;
    let countries = parse_country_list(payload)?;
    let records: Vec<RegionCountry> = countries.iter().map(RegionCountry::from).collect();
    Ok(serde_json::to_value(records)?)
}

/// Handler for GET /api/countries/search
///
/// Always filters a fresh upstream list rather than the cached full listing;
/// the resulting page is cached under the effective search parameters.
pub async fn search_countries(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> Result<Json<Value>> {
    let criteria = params.criteria();
    let key = CacheKey::with_params(Endpoint::Search, criteria.key_params());
    let result = state
        .read_through(key, load_search_page(state.upstream.as_ref(), &criteria))
        .await;

    respond(result, "Error searching countries.")
}

async fn load_search_page(
    upstream: &dyn UpstreamApi,
    criteria: &SearchCriteria,
) -> anyhow::Result<Value> {
    let countries = fetch_all(upstream, LIST_FIELDS).await?;
    let matching: Vec<CountrySummary> = countries
        .iter()
        .filter(|c| criteria.matches(c))
        .map(CountrySummary::from)
        .collect();
    let page = paginate(matching, criteria.page, criteria.limit);
    Ok(serde_json::to_value(page)?)
}

/// Handler for GET /api/countries/compare?codes=A,B
pub async fn compare_countries(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<CompareParams>,
) -> Result<Json<Value>> {
    let (first, second) = params
        .code_pair()
        .ok_or_else(|| ApiError::BadRequest(COMPARE_COUNT_MESSAGE.to_string()))?;

    let key = CacheKey::with_params(Endpoint::Compare, [("codes", format!("{first},{second}"))]);
    let result = state
        .read_through(key, load_comparison(state.upstream.as_ref(), &first, &second))
        .await;

    respond(result, "Error comparing countries.")
}

/// Fetches both countries concurrently; if either fetch fails the whole
/// comparison fails.
async fn load_comparison(
    upstream: &dyn UpstreamApi,
    first: &str,
    second: &str,
) -> anyhow::Result<Value> {
    let (a, b) = tokio::try_join!(fetch_country(upstream, first), fetch_country(upstream, second))?;
    let records = [CountryComparison::from(&a), CountryComparison::from(&b)];
    Ok(serde_json::to_value(records)?)
}

/// Handler for GET /api/filters
pub async fn list_filters(State(state): State<AppState>) -> Result<Json<Value>> {
    let key = CacheKey::new(Endpoint::Filters);
    let result = state
        .read_through(key, load_filters(state.upstream.as_ref()))
        .await;

    respond(result, "Error fetching filters.")
}

async fn load_filters(upstream: &dyn UpstreamApi) -> anyhow::Result<Value> {
    let countries = fetch_all(upstream, FILTER_FIELDS).await?;
    Ok(serde_json::to_value(Filters::from_countries(&countries))?)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::upstream::UpstreamError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Serves a fixed payload for every path and counts calls.
    struct StaticUpstream {
        payload: Value,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl UpstreamApi for StaticUpstream {
        async fn get(
            &self,
            _segments: &[&str],
            _params: &[(&str, &str)],
        ) -> std::result::Result<Value, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }
    }

    fn state_with(payload: Value) -> (AppState, Arc<StaticUpstream>, ManualClock) {
        let upstream = Arc::new(StaticUpstream {
            payload,
            calls: AtomicUsize::new(0),
        });
        let clock = ManualClock::new(0);
        let cache = ResponseCache::with_clock(Duration::from_secs(3600), Arc::new(clock.clone()));
        (AppState::new(cache, upstream.clone()), upstream, clock)
    }

    #[tokio::test]
    async fn test_read_through_fetches_once() {
        let (state, upstream, _) = state_with(json!([]));

        let first = list_countries(State(state.clone())).await.unwrap();
        let second = list_countries(State(state.clone())).await.unwrap();

        assert_eq!(first.0, second.0);
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_read_through_refetches_after_ttl() {
        let (state, upstream, clock) = state_with(json!([]));

        list_filters(State(state.clone())).await.unwrap();
        clock.advance(Duration::from_secs(3600));
        list_filters(State(state.clone())).await.unwrap();
        list_filters(State(state)).await.unwrap();

        assert_eq!(upstream.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_processing_failure_is_not_cached() {
        let (state, upstream, _) = state_with(json!({"status": 404, "message": "Not Found"}));

        assert!(list_countries(State(state.clone())).await.is_err());
        assert!(list_countries(State(state.clone())).await.is_err());

        assert_eq!(upstream.calls.load(Ordering::SeqCst), 2);
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (state, _, _) = state_with(json!([]));
        list_countries(State(state.clone())).await.unwrap();
        list_countries(State(state.clone())).await.unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 1);
        assert_eq!(response.misses, 1);
        assert_eq!(response.total_entries, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
