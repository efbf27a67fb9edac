//! REST Countries HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, error};

use super::{display_path, UpstreamApi, UpstreamError};

/// Longest upstream error body echoed into the log.
const MAX_LOGGED_BODY: usize = 512;

// == Rest Countries Client ==
/// [`UpstreamApi`] over HTTP with a fixed base address and timeout.
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    http: Client,
    base_url: String,
}

impl RestCountriesClient {
    /// Creates a client for `base_url` whose every request gives up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `segments` to the base address, escaping each as a single
    /// path segment so `/`, `?` and `#` inside a value stay inside it.
    fn url_for(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let invalid = |reason: String| UpstreamError::InvalidUrl {
            url: format!("{}{}", self.base_url, display_path(segments)),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("base address cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let url = self.url_for(segments)?;
        let path = display_path(segments);

        let mut request = self.http.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await.map_err(|source| {
            if source.is_timeout() {
                UpstreamError::Timeout { path: path.clone() }
            } else {
                UpstreamError::Transport {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_LOGGED_BODY).collect();
            debug!(path = %path, body = %body, "upstream error body");
            return Err(UpstreamError::Status {
                path,
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|source| {
            if source.is_timeout() {
                UpstreamError::Timeout { path: path.clone() }
            } else {
                UpstreamError::Decode {
                    path: path.clone(),
                    source,
                }
            }
        })
    }
}

#[async_trait]
impl UpstreamApi for RestCountriesClient {
    async fn get(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        debug!(?segments, ?params, "upstream request");
        let result = self.fetch(segments, params).await;
        if let Err(e) = &result {
            error!(error = %e, "API Error");
        }
        result
    }
}
