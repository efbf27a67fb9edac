//! API Module
//!
//! HTTP handlers, request validation, and routing for the country proxy.
//!
//! # Endpoints
//! - `GET /api/countries` - All countries
//! - `GET /api/countries/search` - Filtered, paginated search
//! - `GET /api/countries/compare?codes=A,B` - Two countries side by side
//! - `GET /api/countries/region/:region` - Countries in a region
//! - `GET /api/countries/:code` - One country by 2 or 3 letter code
//! - `GET /api/filters` - Distinct regions and timezones
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;
pub mod validation;

pub use handlers::*;
pub use routes::create_router;
