//! Nominatim place search client
//!
//! Resolves free-text queries to places using the
//! [Nominatim](https://nominatim.openstreetmap.org) search API, biased
//! towards the visible map area through `viewbox`.
//!
//! Requests are spaced according to the Nominatim usage policy and results
//! are cached per query and area.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::BoundingRegion;
use moka::future::Cache;
use reqwest::Client;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::config::NominatimConfig;
use crate::error::OsmError;
use crate::models::{RawSearchResult, SearchHit};

/// Trait for place search clients
#[async_trait]
pub trait PlaceSearchClient: Send + Sync {
    /// Search for places matching `query`, preferring those inside `area`
    ///
    /// Hits keep the service's ranking order.
    async fn search(
        &self,
        query: &str,
        area: &BoundingRegion,
    ) -> Result<Vec<SearchHit>, OsmError>;
}

/// Nominatim-based place search with request spacing and caching
#[derive(Debug)]
pub struct NominatimSearchClient {
    client: Client,
    config: NominatimConfig,
    cache: Option<Cache<String, Vec<SearchHit>>>,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl NominatimSearchClient {
    /// Create a new Nominatim search client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, OsmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| OsmError::ConnectionFailed(e.to_string()))?;

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(config.cache_ttl_minutes * 60))
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Space requests by the configured minimum interval
    async fn rate_limit(&self) {
        let interval = Duration::from_millis(self.config.min_request_interval_ms);
        if interval.is_zero() {
            return;
        }
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                let wait = interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting search request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// `viewbox` parameter: `minLon,maxLat,maxLon,minLat`
    fn viewbox(area: &BoundingRegion) -> String {
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            area.min_longitude, area.max_latitude, area.max_longitude, area.min_latitude
        )
    }

    fn cache_key(query: &str, viewbox: &str) -> String {
        format!("{}|{viewbox}", query.to_lowercase())
    }

    fn parse_response(body: &str) -> Result<Vec<SearchHit>, OsmError> {
        let raw: Vec<RawSearchResult> =
            serde_json::from_str(body).map_err(|e| OsmError::ParseError(e.to_string()))?;

        let total = raw.len();
        let hits: Vec<SearchHit> = raw
            .into_iter()
            .filter_map(|result| {
                SearchHit::try_from(result)
                    .inspect_err(|e| warn!(error = %e, "Skipping malformed search result"))
                    .ok()
            })
            .collect();

        if hits.len() < total {
            debug!(skipped = total - hits.len(), "Dropped malformed results");
        }
        Ok(hits)
    }
}

#[async_trait]
impl PlaceSearchClient for NominatimSearchClient {
    #[instrument(skip(self, area))]
    async fn search(
        &self,
        query: &str,
        area: &BoundingRegion,
    ) -> Result<Vec<SearchHit>, OsmError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let viewbox = Self::viewbox(area);
        let cache_key = Self::cache_key(query, &viewbox);
        let cached = match &self.cache {
            Some(cache) => cache.get(&cache_key).await,
            None => None,
        };
        if let Some(hits) = cached {
            debug!(count = hits.len(), "Search cache hit");
            return Ok(hits);
        }

        self.rate_limit().await;

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let params = [
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", self.config.max_results.to_string()),
            ("viewbox", viewbox),
            ("bounded", "0".to_string()),
            ("accept-language", self.config.accept_language.clone()),
        ];

        debug!(%url, "Searching places");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| OsmError::from_send(&e, self.config.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OsmError::from_status(status, response.headers()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OsmError::ParseError(e.to_string()))?;
        let hits = Self::parse_response(&body)?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, hits.clone()).await;
        }
        debug!(count = hits.len(), "Places found");
        Ok(hits)
    }
}
