//! API Routes
//!
//! Configures the Axum router with all country proxy endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    compare_countries, countries_by_region, country_by_code, health_handler, list_countries,
    list_filters, search_countries, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// The static `search` and `compare` segments take precedence over the
/// `:code` capture, so they never reach the code validator.
///
/// # Middleware
/// - CORS: Allows any origin, for the browser UI
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/countries", get(list_countries))
        .route("/api/countries/search", get(search_countries))
        .route("/api/countries/compare", get(compare_countries))
        .route("/api/countries/region/:region", get(countries_by_region))
        .route("/api/countries/:code", get(country_by_code))
        .route("/api/filters", get(list_filters))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
