//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use country_cache::{
    api::create_router,
    cache::{ManualClock, ResponseCache},
    upstream::{display_path, UpstreamApi, UpstreamError},
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TTL: Duration = Duration::from_secs(3600);

// == Fake Upstream ==

/// Canned upstream keyed by joined path (`/alpha/DE`). Unknown paths answer 404.
#[derive(Default)]
pub struct FakeUpstream {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, payload: Value) -> Self {
        self.responses.insert(path.to_string(), payload);
        self
    }

    /// Paths requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl UpstreamApi for FakeUpstream {
    async fn get(&self, segments: &[&str], _params: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let path = display_path(segments);
        self.calls.lock().unwrap().push(path.clone());
        self.responses
            .get(&path)
            .cloned()
            .ok_or(UpstreamError::Status { path, status: 404 })
    }
}

// == App Construction ==

pub struct TestApp {
    pub router: Router,
    pub upstream: Arc<FakeUpstream>,
    pub clock: ManualClock,
}

impl TestApp {
    pub fn new(upstream: FakeUpstream) -> Self {
        let upstream = Arc::new(upstream);
        let clock = ManualClock::new(1_700_000_000_000);
        let cache = ResponseCache::with_clock(TTL, Arc::new(clock.clone()));
        let state = AppState::new(cache, upstream.clone());
        Self {
            router: create_router(state),
            upstream,
            clock,
        }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_to_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// == Fixtures ==

pub fn germany() -> Value {
    json!({
        "name": {"common": "Germany", "official": "Federal Republic of Germany"},
        "flags": {"png": "https://flagcdn.com/w320/de.png", "svg": "https://flagcdn.com/de.svg"},
        "region": "Europe",
        "subregion": "Western Europe",
        "population": 83240525,
        "capital": ["Berlin"],
        "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
        "languages": {"deu": "German"},
        "timezones": ["UTC+01:00"],
        "tld": [".de"],
        "cca3": "DEU",
        "area": 357114.0
    })
}

pub fn france() -> Value {
    json!({
        "name": {"common": "France", "official": "French Republic"},
        "flags": {"png": "https://flagcdn.com/w320/fr.png"},
        "region": "Europe",
        "subregion": "Western Europe",
        "population": 67391582,
        "capital": ["Paris"],
        "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
        "languages": {"fra": "French"},
        "timezones": ["UTC-10:00", "UTC+01:00", "UTC+04:00"],
        "tld": [".fr"],
        "cca3": "FRA",
        "area": 551695.0
    })
}

pub fn japan() -> Value {
    json!({
        "name": {"common": "Japan"},
        "flags": {"png": "https://flagcdn.com/w320/jp.png"},
        "region": "Asia",
        "capital": ["Tokyo"],
        "timezones": ["UTC+09:00"],
        "cca3": "JPN"
    })
}

/// `count` minimal countries in one region.
pub fn many_countries(count: usize, region: &str) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "name": {"common": format!("Country {i:02}")},
                "flags": {"png": format!("https://flagcdn.com/w320/{i}.png")},
                "region": region,
                "capital": [format!("Capital {i}")],
                "timezones": ["UTC"],
                "cca3": format!("C{i:02}")
            })
        })
        .collect()
}
