//! In-memory collaborator implementations for testing.
//!
//! Call counters let tests assert that gating logic short-circuits before
//! any collaborator is touched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::types::{ImageCaptioner, MetadataStore, ScoredHit, VectorSearch};
use super::BackendError;
use crate::models::{ArtworkFilter, ArtworkRecord};

/// In-memory artwork store: a seeded record list with optional ranked
/// hits for vector search. Implements all three collaborator roles.
#[derive(Default)]
pub struct InMemoryArtworkStore {
    records: Mutex<Vec<ArtworkRecord>>,
    hits: Mutex<Vec<ScoredHit>>,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    filter_calls: AtomicUsize,
}

impl InMemoryArtworkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&self, record: ArtworkRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Seed the ranked hit list returned by `search` (descending order is
    /// the caller's responsibility, matching the real index contract).
    pub fn set_hits(&self, hits: Vec<ScoredHit>) {
        *self.hits.lock().unwrap() = hits;
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn filter_calls(&self) -> usize {
        self.filter_calls.load(Ordering::SeqCst)
    }
}

impl VectorSearch for InMemoryArtworkStore {
    fn search(&self, _query_text: &str, limit: usize) -> Result<Vec<ScoredHit>, BackendError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let hits = self.hits.lock().unwrap();
        Ok(hits.iter().take(limit).cloned().collect())
    }
}

impl MetadataStore for InMemoryArtworkStore {
    fn fetch_by_ids(&self, ids: &[String]) -> Result<Vec<ArtworkRecord>, BackendError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().unwrap();
        // Preserve the requested order, like the batched RPC does.
        Ok(ids
            .iter()
            .filter_map(|id| records.iter().find(|r| &r.inventory_number == id).cloned())
            .collect())
    }

    fn fetch_filtered(
        &self,
        filter: &ArtworkFilter,
        limit: usize,
    ) -> Result<(Vec<ArtworkRecord>, usize), BackendError> {
        self.filter_calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().unwrap();
        let matching: Vec<ArtworkRecord> = records
            .iter()
            .filter(|r| matches_filter(r, filter))
            .cloned()
            .collect();
        let total = matching.len();
        Ok((matching.into_iter().take(limit).collect(), total))
    }
}

fn matches_filter(record: &ArtworkRecord, filter: &ArtworkFilter) -> bool {
    fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
        haystack
            .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false)
    }

    if let Some(artist) = &filter.artist {
        if !contains_ci(record.artist.as_deref(), artist) {
            return false;
        }
    }
    if let Some(title) = &filter.title {
        if !contains_ci(record.title.as_deref(), title) {
            return false;
        }
    }
    if let Some(inv) = &filter.inventory_number {
        if !contains_ci(Some(record.inventory_number.as_str()), inv) {
            return false;
        }
    }
    if filter.year_from.is_some() || filter.year_to.is_some() {
        let Some(year) = record.year else { return false };
        if filter.year_from.is_some_and(|from| year < from) {
            return false;
        }
        if filter.year_to.is_some_and(|to| year > to) {
            return false;
        }
    }
    if !filter.sources.is_empty() {
        let Some(source) = &record.source else {
            return false;
        };
        if !filter.sources.iter().any(|s| s == source) {
            return false;
        }
    }
    true
}

/// Captioner double that always answers with a fixed caption (or `None`).
#[derive(Default)]
pub struct FixedCaptioner {
    caption: Option<String>,
    calls: AtomicUsize,
}

impl FixedCaptioner {
    pub fn answering(caption: &str) -> Self {
        Self {
            caption: Some(caption.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageCaptioner for FixedCaptioner {
    fn caption(&self, _image_base64: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.caption.clone()
    }
}
