//! REST client for the artwork service.
//!
//! One client covers both collaborator roles the service exposes: the
//! vector-search RPC and the metadata queries (filtered listing, batched
//! by-id hydration). The service owns the embedding model; this side only
//! ships query text.

use serde::{Deserialize, Serialize};

use super::types::{MetadataStore, ScoredHit, VectorSearch};
use super::BackendError;
use crate::config::Settings;
use crate::models::{ArtworkFilter, ArtworkRecord};

pub struct RestArtworkStore {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl RestArtworkStore {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.rest_base_url,
            &settings.rest_api_key,
            settings.http_timeout_secs,
        )
    }

    fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).json(body);
        if !self.api_key.is_empty() {
            request = request
                .header("apikey", &self.api_key)
                .bearer_auth(&self.api_key);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                BackendError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                BackendError::Timeout(self.timeout_secs)
            } else {
                BackendError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<R>()
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

// ── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct VectorSearchRequest<'a> {
    query_text: &'a str,
    match_count: usize,
}

#[derive(Serialize)]
struct ArtworksByIdsRequest<'a> {
    ids: &'a [String],
}

#[derive(Serialize)]
struct SearchArtworksRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    artist: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inventory_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year_from: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year_to: Option<i32>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    sources: &'a [String],
    limit: usize,
}

#[derive(Deserialize)]
struct SearchArtworksResponse {
    items: Vec<ArtworkRecord>,
    total_count: usize,
}

impl VectorSearch for RestArtworkStore {
    fn search(&self, query_text: &str, limit: usize) -> Result<Vec<ScoredHit>, BackendError> {
        let hits: Vec<ScoredHit> = self.post(
            "/rpc/vector_search",
            &VectorSearchRequest {
                query_text,
                match_count: limit,
            },
        )?;
        tracing::debug!(count = hits.len(), "Vector search returned");
        Ok(hits)
    }
}

impl MetadataStore for RestArtworkStore {
    fn fetch_by_ids(&self, ids: &[String]) -> Result<Vec<ArtworkRecord>, BackendError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.post("/rpc/artworks_by_ids", &ArtworksByIdsRequest { ids })
    }

    fn fetch_filtered(
        &self,
        filter: &ArtworkFilter,
        limit: usize,
    ) -> Result<(Vec<ArtworkRecord>, usize), BackendError> {
        let response: SearchArtworksResponse = self.post(
            "/rpc/search_artworks",
            &SearchArtworksRequest {
                artist: filter.artist.as_deref(),
                title: filter.title.as_deref(),
                inventory_number: filter.inventory_number.as_deref(),
                year_from: filter.year_from,
                year_to: filter.year_to,
                sources: &filter.sources,
                limit,
            },
        )?;
        tracing::debug!(
            returned = response.items.len(),
            total = response.total_count,
            "Filtered artwork query returned"
        );
        Ok((response.items, response.total_count))
    }
}
