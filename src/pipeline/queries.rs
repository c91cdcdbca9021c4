//! Query execution for the search operators.
//!
//! All three paths follow the same two-phase discipline: rank or filter
//! cheaply over identifiers and scores, compute the total match count
//! before the preview window is cut, then hydrate full display records
//! with one batched metadata lookup for the visible slice only. The full
//! filtered set is never hydrated.

use crate::backend::{ImageCaptioner, MetadataStore, VectorSearch};
use crate::config::{Settings, CANDIDATE_POOL_SIZE};
use crate::models::ArtworkFilter;

use super::operator::SearchOutcome;
use super::params::{text_param, ParamBag, ParamValue};
use super::result_mode::ResultSelection;
use super::PipelineError;

/// Text-query vector search with result-mode narrowing.
pub fn semantic_search(
    params: &ParamBag,
    vector: &dyn VectorSearch,
    metadata: &dyn MetadataStore,
    settings: &Settings,
) -> Result<SearchOutcome, PipelineError> {
    let query_text = text_param(params, "query_text");
    if query_text.is_empty() {
        tracing::warn!("Semantic search invoked without query text");
        return Ok(SearchOutcome::empty());
    }

    let selection = ResultSelection::from_params(params)?;
    tracing::info!(query = query_text, mode = ?selection, "Semantic search starting");

    ranked_search(query_text, selection, vector, metadata, settings)
}

/// Structured metadata filtering.
pub fn metadata_filter(
    params: &ParamBag,
    metadata: &dyn MetadataStore,
    settings: &Settings,
) -> Result<SearchOutcome, PipelineError> {
    let filter = filter_from_params(params);
    if filter.is_empty() {
        tracing::warn!("Metadata filter invoked with no active criteria");
        return Ok(SearchOutcome::empty());
    }
    tracing::info!(?filter, "Metadata filter starting");

    let (records, total) = metadata.fetch_filtered(&filter, settings.preview_results_count)?;
    if total == 0 {
        tracing::info!("No artworks matched the metadata filter");
        return Ok(SearchOutcome::empty());
    }

    let preview = records
        .iter()
        .map(|record| record.to_summary(&settings.image_base_url))
        .collect::<Vec<_>>();
    tracing::info!(shown = preview.len(), total, "Metadata filter complete");
    Ok(SearchOutcome { preview, total })
}

/// Image-similarity search: caption the uploaded image, then run the same
/// ranked search as the text path using the caption as query.
pub fn similarity_search(
    params: &ParamBag,
    captioner: &dyn ImageCaptioner,
    vector: &dyn VectorSearch,
    metadata: &dyn MetadataStore,
    settings: &Settings,
) -> Result<SearchOutcome, PipelineError> {
    let Some(image) = params.get("query_image").and_then(ParamValue::as_image) else {
        tracing::warn!("Similarity search invoked without an uploaded image");
        return Ok(SearchOutcome::empty());
    };
    if image.data.is_empty() {
        tracing::warn!(filename = %image.filename, "Uploaded image has no data");
        return Ok(SearchOutcome::empty());
    }

    let selection = ResultSelection::from_params(params)?;
    tracing::info!(filename = %image.filename, mode = ?selection, "Similarity search starting");

    // A failed caption is a dead end: without query text there is nothing
    // to search for, so no vector query is attempted.
    let Some(caption) = captioner.caption(&image.data) else {
        tracing::error!("Could not generate a caption from the uploaded image");
        return Ok(SearchOutcome::empty());
    };
    tracing::info!(chars = caption.len(), "Caption generated, searching");

    ranked_search(&caption, selection, vector, metadata, settings)
}

/// Shared tail of the two vector-search paths: pool, narrow, count,
/// hydrate the preview slice.
fn ranked_search(
    query_text: &str,
    selection: ResultSelection,
    vector: &dyn VectorSearch,
    metadata: &dyn MetadataStore,
    settings: &Settings,
) -> Result<SearchOutcome, PipelineError> {
    let pool = vector.search(query_text, CANDIDATE_POOL_SIZE)?;
    if pool.is_empty() {
        tracing::info!("Vector search returned no candidates");
        return Ok(SearchOutcome::empty());
    }
    tracing::debug!(candidates = pool.len(), "Vector search returned");

    let filtered = selection.apply(pool);
    // The total must reflect the whole filtered set, not the preview page.
    let total = filtered.len();
    if total == 0 {
        tracing::info!("No candidates survived the result-mode filter");
        return Ok(SearchOutcome::empty());
    }

    let preview_ids: Vec<String> = filtered
        .iter()
        .take(settings.preview_results_count)
        .map(|hit| hit.inventory_number.clone())
        .collect();

    let records = metadata.fetch_by_ids(&preview_ids)?;
    let preview = records
        .iter()
        .map(|record| record.to_summary(&settings.image_base_url))
        .collect::<Vec<_>>();

    tracing::info!(shown = preview.len(), total, "Search complete");
    Ok(SearchOutcome { preview, total })
}

/// Translate the Metadata Filter parameter bag into store criteria.
/// Blank fields are left out of the filter entirely.
pub fn filter_from_params(params: &ParamBag) -> ArtworkFilter {
    let non_empty = |name: &str| -> Option<String> {
        let value = text_param(params, name);
        (!value.is_empty()).then(|| value.to_string())
    };

    let (year_from, year_to) = params
        .get("year_range")
        .and_then(ParamValue::as_range)
        .unwrap_or((None, None));

    ArtworkFilter {
        artist: non_empty("artist"),
        title: non_empty("title"),
        inventory_number: non_empty("inventory_number"),
        year_from: year_from.map(|y| y as i32),
        year_to: year_to.map(|y| y as i32),
        sources: params
            .get("source")
            .and_then(ParamValue::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{FixedCaptioner, InMemoryArtworkStore};
    use crate::backend::ScoredHit;
    use crate::models::ArtworkRecord;

    fn settings() -> Settings {
        Settings::default()
    }

    fn store_with_ranked_pool(count: usize) -> InMemoryArtworkStore {
        let store = InMemoryArtworkStore::new();
        let hits = (0..count)
            .map(|i| {
                let inv = format!("INV-{i}");
                store.add_record(ArtworkRecord {
                    inventory_number: inv.clone(),
                    title: Some(format!("Work {i}")),
                    artist: Some("James Ensor".to_string()),
                    dating: Some("1890".to_string()),
                    year: Some(1890),
                    source: Some("KMSKA".to_string()),
                    image_path: Some(format!("/img/{i}.jpg")),
                });
                ScoredHit {
                    inventory_number: inv,
                    similarity: 1.0 - i as f32 / count as f32,
                }
            })
            .collect();
        store.set_hits(hits);
        store
    }

    fn bag(entries: &[(&str, ParamValue)]) -> ParamBag {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn total_is_counted_before_preview_truncation() {
        let store = store_with_ranked_pool(200);
        let params = bag(&[
            ("query_text", ParamValue::Text("dark painting".to_string())),
            ("result_mode", ParamValue::Text("top_n".to_string())),
            ("n_results", ParamValue::Integer(137)),
        ]);

        let outcome = semantic_search(&params, &store, &store, &settings()).unwrap();
        assert_eq!(outcome.total, 137);
        assert_eq!(outcome.preview.len(), 10);
    }

    #[test]
    fn hydration_covers_only_the_preview_window() {
        let store = store_with_ranked_pool(50);
        let params = bag(&[(
            "query_text",
            ParamValue::Text("dark painting".to_string()),
        )]);

        let outcome = semantic_search(&params, &store, &store, &settings()).unwrap();
        assert_eq!(outcome.preview.len(), 10);
        // One batched lookup for the preview slice, nothing more.
        assert_eq!(store.fetch_calls(), 1);
        assert_eq!(
            outcome.preview[0].image_url,
            "https://www.opac-fabritius.be/img/0.jpg"
        );
    }

    #[test]
    fn blank_query_returns_empty_without_searching() {
        let store = store_with_ranked_pool(5);
        let params = bag(&[("query_text", ParamValue::Text("  ".to_string()))]);

        let outcome = semantic_search(&params, &store, &store, &settings()).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(store.search_calls(), 0);
    }

    #[test]
    fn empty_pool_is_a_valid_empty_outcome() {
        let store = InMemoryArtworkStore::new();
        let params = bag(&[(
            "query_text",
            ParamValue::Text("nonexistent theme".to_string()),
        )]);

        let outcome = semantic_search(&params, &store, &store, &settings()).unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn similarity_range_narrowing_applies_before_count() {
        let store = store_with_ranked_pool(10); // scores 1.0, 0.9, ..., 0.1
        let params = bag(&[
            ("query_text", ParamValue::Text("portrait".to_string())),
            (
                "result_mode",
                ParamValue::Text("similarity_range".to_string()),
            ),
            ("similarity_min", ParamValue::Float(0.55)),
            ("similarity_max", ParamValue::Float(1.0)),
        ]);

        let outcome = semantic_search(&params, &store, &store, &settings()).unwrap();
        assert_eq!(outcome.total, 5);
    }

    #[test]
    fn caption_failure_short_circuits_before_the_vector_query() {
        let store = store_with_ranked_pool(5);
        let captioner = FixedCaptioner::failing();
        let params = bag(&[(
            "query_image",
            ParamValue::Image(crate::pipeline::params::ImageUpload {
                filename: "query.jpg".to_string(),
                data: "QUJD".to_string(),
            }),
        )]);

        let outcome =
            similarity_search(&params, &captioner, &store, &store, &settings()).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(captioner.calls(), 1);
        assert_eq!(store.search_calls(), 0);
    }

    #[test]
    fn similarity_search_uses_the_caption_as_query() {
        let store = store_with_ranked_pool(20);
        let captioner = FixedCaptioner::answering("a dark dramatic painting of masks");
        let params = bag(&[
            (
                "query_image",
                ParamValue::Image(crate::pipeline::params::ImageUpload {
                    filename: "query.jpg".to_string(),
                    data: "QUJD".to_string(),
                }),
            ),
            ("result_mode", ParamValue::Text("top_n".to_string())),
            ("n_results", ParamValue::Integer(3)),
        ]);

        let outcome =
            similarity_search(&params, &captioner, &store, &store, &settings()).unwrap();
        assert_eq!(outcome.total, 3);
        assert_eq!(store.search_calls(), 1);
    }

    #[test]
    fn metadata_filter_reports_store_total() {
        let store = store_with_ranked_pool(30);
        let params = bag(&[("artist", ParamValue::Text("Ensor".to_string()))]);

        let outcome = metadata_filter(&params, &store, &settings()).unwrap();
        assert_eq!(outcome.total, 30);
        assert_eq!(outcome.preview.len(), 10);
    }

    #[test]
    fn metadata_filter_without_criteria_skips_the_store() {
        let store = store_with_ranked_pool(5);
        let outcome = metadata_filter(&ParamBag::new(), &store, &settings()).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(store.filter_calls(), 0);
    }

    #[test]
    fn filter_params_translate_field_by_field() {
        let params = bag(&[
            ("artist", ParamValue::Text(" Ensor ".to_string())),
            ("title", ParamValue::Text(String::new())),
            ("year_range", ParamValue::Range(Some(1880), Some(1900))),
            (
                "source",
                ParamValue::List(vec!["KMSKA".to_string()]),
            ),
        ]);
        let filter = filter_from_params(&params);
        assert_eq!(filter.artist.as_deref(), Some("Ensor"));
        assert_eq!(filter.title, None);
        assert_eq!(filter.year_from, Some(1880));
        assert_eq!(filter.year_to, Some(1900));
        assert_eq!(filter.sources, vec!["KMSKA"]);
    }
}
