//! Data models for the country proxy
//!
//! Upstream payloads, the normalized records returned to clients, search
//! criteria, and the service's own status responses.

pub mod country;
pub mod responses;
pub mod search;

// Re-export commonly used types
pub use country::{
    CountryComparison, CountryDetail, CountrySummary, Currency, Filters, RawCountry, RegionCountry,
};
pub use responses::{HealthResponse, StatsResponse};
pub use search::{paginate, SearchCriteria, SearchPage};
