//! Configuration Module
//!
//! Loads server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_TTL_SECS;

/// Default upstream REST Countries base address.
pub const DEFAULT_UPSTREAM_URL: &str = "https://restcountries.com/v3.1";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base address of the upstream country-data API
    pub upstream_url: String,
    /// Time-to-live for cached responses, in seconds
    pub cache_ttl: u64,
    /// Per-request upstream timeout, in seconds
    pub upstream_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `REST_COUNTRIES_API` - Upstream base address (default: https://restcountries.com/v3.1)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 3600)
    /// - `UPSTREAM_TIMEOUT` - Upstream timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// Unset or unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            server_port: parse_or(&lookup, "PORT", defaults.server_port),
            upstream_url: lookup("REST_COUNTRIES_API")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.upstream_url),
            cache_ttl: parse_or(&lookup, "CACHE_TTL", defaults.cache_ttl),
            upstream_timeout: parse_or(&lookup, "UPSTREAM_TIMEOUT", defaults.upstream_timeout),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            cache_ttl: DEFAULT_TTL_SECS,
            upstream_timeout: 10,
        }
    }
}
