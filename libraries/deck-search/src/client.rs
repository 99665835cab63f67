//! HTTP client for the track search service.

use crate::error::{Result, SearchError};
use crate::types::{RemoteTrack, SearchConfig};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Source of raw search results.
///
/// The gateway only needs "query in, descriptors out"; tests and alternative
/// transports implement this instead of speaking HTTP.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetch the descriptors matching `query`, in service order.
    async fn fetch(&self, query: &str) -> Result<Vec<RemoteTrack>>;
}

/// Search backend talking to the remote search endpoint over HTTP.
///
/// # Example
///
/// ```ignore
/// use deck_search::{HttpSearchClient, SearchBackend, SearchConfig};
///
/// let client = HttpSearchClient::new(SearchConfig::new("https://search.example.com/api/buscar"))?;
/// let tracks = client.fetch("guns n roses").await?;
/// println!("Found {} tracks", tracks.len());
/// ```
pub struct HttpSearchClient {
    http: Client,
    endpoint: Url,
    query_param: String,
}

impl HttpSearchClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SearchConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim();
        if endpoint.is_empty() {
            return Err(SearchError::InvalidEndpoint(
                "endpoint cannot be empty".into(),
            ));
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(SearchError::InvalidEndpoint(
                "endpoint must start with http:// or https://".into(),
            ));
        }
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SearchError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        if config.query_param.is_empty() {
            return Err(SearchError::InvalidEndpoint(
                "query parameter name cannot be empty".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout().min(Duration::from_secs(10)))
            .user_agent(format!("DeckPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::InvalidEndpoint(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            query_param: config.query_param,
        })
    }

    /// The configured endpoint, without the query.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(&self.query_param, query);
        url
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn fetch(&self, query: &str) -> Result<Vec<RemoteTrack>> {
        let url = self.request_url(query);
        debug!(url = %url, "Searching tracks");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Request {
                query: query.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();

        if status.is_success() {
            let tracks: Vec<RemoteTrack> = response.json().await.map_err(|e| SearchError::Parse {
                query: query.to_string(),
                message: e.to_string(),
            })?;

            debug!(query = %query, results = tracks.len(), "Search response received");

            Ok(tracks)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(SearchError::Server {
                query: query.to_string(),
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}
