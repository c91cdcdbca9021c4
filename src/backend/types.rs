use serde::{Deserialize, Serialize};

use super::BackendError;
use crate::models::{ArtworkFilter, ArtworkRecord};

/// One ranked candidate from the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHit {
    pub inventory_number: String,
    /// Cosine similarity in [0, 1], higher is closer.
    pub similarity: f32,
}

/// Semantic vector search over the artwork index.
///
/// Results come back ranked by descending similarity. An empty result set
/// is `Ok(vec![])`, never an error. The embedding model lives behind this
/// boundary; callers only supply query text.
pub trait VectorSearch: Send + Sync {
    fn search(&self, query_text: &str, limit: usize) -> Result<Vec<ScoredHit>, BackendError>;
}

/// Artwork metadata lookups.
pub trait MetadataStore: Send + Sync {
    /// Batched hydration of full records for a set of inventory numbers.
    fn fetch_by_ids(&self, ids: &[String]) -> Result<Vec<ArtworkRecord>, BackendError>;

    /// Filtered listing. Returns the first page of matching records plus
    /// the total match count across all pages.
    fn fetch_filtered(
        &self,
        filter: &ArtworkFilter,
        limit: usize,
    ) -> Result<(Vec<ArtworkRecord>, usize), BackendError>;
}

/// Image-to-text captioning.
///
/// Returns `None` on any failure (connection, refusal, empty output) by
/// convention; callers treat a missing caption as "no results", not as an
/// error to surface.
pub trait ImageCaptioner: Send + Sync {
    fn caption(&self, image_base64: &str) -> Option<String>;
}
