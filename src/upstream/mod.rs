//! Upstream Module
//!
//! Access to the external REST Countries API.
//!
//! Handlers depend on the [`UpstreamApi`] trait rather than on the HTTP
//! client, so tests can substitute a canned data source.

mod client;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use client::RestCountriesClient;

// == Upstream Error ==
/// Failure talking to the upstream API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// No response within the configured timeout
    #[error("upstream request to {path} timed out")]
    Timeout { path: String },

    /// Upstream answered with a non-success status
    #[error("upstream returned {status} for {path}")]
    Status { path: String, status: u16 },

    /// Connection, TLS, or protocol failure
    #[error("upstream request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body was not valid JSON
    #[error("upstream response for {path} was not valid JSON: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The configured base address cannot be combined with the path
    #[error("invalid upstream url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

// == Upstream Api Trait ==
/// A source of raw country data.
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    /// Fetches the resource named by `segments` (relative to the base
    /// address) with the given query parameters and returns the decoded JSON
    /// body. Each segment is one path segment; implementations escape any
    /// reserved characters inside it.
    ///
    /// # Errors
    ///
    /// Any timeout, non-2xx status, transport failure, or undecodable body.
    /// Implementations do not retry.
    async fn get(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Value, UpstreamError>;
}

/// Human-readable form of a segment path, used in logs and errors.
pub fn display_path(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}
