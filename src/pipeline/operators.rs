//! Concrete operator strategies and their catalog registration.
//!
//! The three working operators delegate to the query execution functions;
//! the remaining three are placeholders that hold a spot in the operator
//! library until their search backends exist.

use std::sync::Arc;

use crate::backend::SearchBackends;
use crate::config::Settings;

use super::operator::{Operator, SearchOutcome};
use super::params::{count_param, text_param, ParamBag, ParamValue};
use super::queries;
use super::registry::OperatorRegistry;
use super::schema::{OperatorBuilder, ParamBuilder};
use super::PipelineError;

/// Canonical operator names, used for registration and pipeline files.
pub mod names {
    pub const METADATA_FILTER: &str = "Metadata Filter";
    pub const SEMANTIC_SEARCH: &str = "Semantic Search";
    pub const SIMILARITY_SEARCH: &str = "Similarity Search";
    pub const POSE_SEARCH: &str = "Pose Search";
    pub const SKETCH_SEARCH: &str = "Sketch Search";
    pub const COLOR_SEARCH: &str = "Color-Based Search";
}

// ═══════════════════════════════════════════════════════════
// Working operators
// ═══════════════════════════════════════════════════════════

/// Structured filtering over artist, title, inventory number, year range
/// and source collection.
pub struct MetadataFilterOperator {
    backends: SearchBackends,
    settings: Arc<Settings>,
}

impl Operator for MetadataFilterOperator {
    fn name(&self) -> &str {
        names::METADATA_FILTER
    }

    fn execute(&self, params: &ParamBag) -> Result<SearchOutcome, PipelineError> {
        queries::metadata_filter(params, &*self.backends.metadata, &self.settings)
    }

    fn is_configured(&self, params: &ParamBag) -> bool {
        !queries::filter_from_params(params).is_empty()
    }

    fn validate_params(&self, params: &ParamBag) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some((Some(from), Some(to))) =
            params.get("year_range").and_then(ParamValue::as_range)
        {
            if from > to {
                problems.push("Year range start must be before end".to_string());
            }
        }
        problems
    }
}

/// Free-text semantic search over the vector index.
pub struct SemanticSearchOperator {
    backends: SearchBackends,
    settings: Arc<Settings>,
}

impl Operator for SemanticSearchOperator {
    fn name(&self) -> &str {
        names::SEMANTIC_SEARCH
    }

    fn execute(&self, params: &ParamBag) -> Result<SearchOutcome, PipelineError> {
        queries::semantic_search(
            params,
            &*self.backends.vector,
            &*self.backends.metadata,
            &self.settings,
        )
    }

    fn is_configured(&self, params: &ParamBag) -> bool {
        !text_param(params, "query_text").is_empty()
    }

    fn validate_params(&self, params: &ParamBag) -> Vec<String> {
        let mut problems = Vec::new();
        if text_param(params, "query_text").is_empty() {
            problems.push("Search query is required".to_string());
        }
        if count_param(params, "n_results", 10) < 1 {
            problems.push("Number of results must be at least 1".to_string());
        }
        problems
    }

    fn unconfigured_message(&self) -> String {
        format!("Please configure the {} operator first", self.name())
    }
}

/// Upload-an-image search: the image is captioned, then the caption runs
/// through the same ranked search as the text path.
pub struct SimilaritySearchOperator {
    backends: SearchBackends,
    settings: Arc<Settings>,
}

impl Operator for SimilaritySearchOperator {
    fn name(&self) -> &str {
        names::SIMILARITY_SEARCH
    }

    fn execute(&self, params: &ParamBag) -> Result<SearchOutcome, PipelineError> {
        queries::similarity_search(
            params,
            &*self.backends.captioner,
            &*self.backends.vector,
            &*self.backends.metadata,
            &self.settings,
        )
    }

    fn is_configured(&self, params: &ParamBag) -> bool {
        params
            .get("query_image")
            .and_then(ParamValue::as_image)
            .map(|image| !image.data.is_empty())
            .unwrap_or(false)
    }

    fn validate_params(&self, params: &ParamBag) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.is_configured(params) {
            problems.push("Image upload is required".to_string());
        }
        if count_param(params, "n_results", 10) < 1 {
            problems.push("Number of results must be at least 1".to_string());
        }
        problems
    }

    fn loading_message(&self) -> &str {
        // Slower than the text path: a captioning round-trip happens first.
        "Generating caption and searching..."
    }

    fn unconfigured_message(&self) -> String {
        format!("Please configure the {} operator first", self.name())
    }
}

// ═══════════════════════════════════════════════════════════
// Placeholder operators
// ═══════════════════════════════════════════════════════════

/// A catalog entry whose search backend does not exist yet. Executing it
/// is harmless: it logs a warning and reports zero results.
struct PlaceholderOperator {
    name: &'static str,
    required_param: &'static str,
    missing_message: &'static str,
    loading: &'static str,
}

impl Operator for PlaceholderOperator {
    fn name(&self) -> &str {
        self.name
    }

    fn execute(&self, _params: &ParamBag) -> Result<SearchOutcome, PipelineError> {
        tracing::warn!(
            operator = self.name,
            "Operator not yet implemented, returning empty results"
        );
        Ok(SearchOutcome::empty())
    }

    fn is_configured(&self, params: &ParamBag) -> bool {
        params
            .get(self.required_param)
            .map(|value| !value.is_blank())
            .unwrap_or(false)
    }

    fn validate_params(&self, params: &ParamBag) -> Vec<String> {
        if self.is_configured(params) {
            Vec::new()
        } else {
            vec![self.missing_message.to_string()]
        }
    }

    fn loading_message(&self) -> &str {
        self.loading
    }

    fn unconfigured_message(&self) -> String {
        format!("Please configure the {} operator first", self.name)
    }
}

// ═══════════════════════════════════════════════════════════
// Registration
// ═══════════════════════════════════════════════════════════

/// Register the full built-in operator set on a registry.
///
/// Factories capture shared collaborator handles, so every created
/// strategy talks to the same backends.
pub fn register_builtin_operators(
    registry: &mut OperatorRegistry,
    backends: SearchBackends,
    settings: Arc<Settings>,
) {
    register_metadata_filter(registry, backends.clone(), settings.clone());
    register_semantic_search(registry, backends.clone(), settings.clone());
    register_similarity_search(registry, backends, settings);
    register_pose_search(registry);
    register_sketch_search(registry);
    register_color_search(registry);
    tracing::info!(count = registry.len(), "Registered built-in operators");
}

/// Shared result-mode parameter trio, appended to both vector-search
/// operators. `n_results` only shows for the count-based modes, the
/// similarity bounds only for the range mode.
fn with_result_mode_params(builder: OperatorBuilder) -> OperatorBuilder {
    builder
        .param(
            "result_mode",
            ParamBuilder::select()
                .label("Result Selection Mode")
                .description("Choose how to filter results (required)")
                .option("top_n", "Top N Results")
                .option("last_n", "Last N Results")
                .option("similarity_range", "Similarity Range")
                .default(ParamValue::Text("top_n".to_string()))
                .required(),
        )
        .param(
            "n_results",
            ParamBuilder::number()
                .label("Number of Results")
                .description("Number of results to return")
                .default(ParamValue::Integer(10))
                .min_value(1.0)
                .max_value(1000.0)
                .shown_when("result_mode", ["top_n", "last_n"]),
        )
        .param(
            "similarity_min",
            ParamBuilder::number()
                .label("Minimum Similarity")
                .description("Minimum similarity threshold (0-1)")
                .default(ParamValue::Float(0.0))
                .min_value(0.0)
                .max_value(1.0)
                .shown_when("result_mode", ["similarity_range"]),
        )
        .param(
            "similarity_max",
            ParamBuilder::number()
                .label("Maximum Similarity")
                .description("Maximum similarity threshold (0-1)")
                .default(ParamValue::Float(1.0))
                .min_value(0.0)
                .max_value(1.0)
                .shown_when("result_mode", ["similarity_range"]),
        )
}

fn register_metadata_filter(
    registry: &mut OperatorRegistry,
    backends: SearchBackends,
    settings: Arc<Settings>,
) {
    let source_options: Vec<&str> = settings
        .source_collections
        .iter()
        .map(String::as_str)
        .collect();
    let (name, metadata) = OperatorBuilder::new(names::METADATA_FILTER)
        .icon("filter_alt")
        .description("Filter artworks by metadata attributes")
        .param(
            "source",
            ParamBuilder::multiselect()
                .label("Source Collection")
                .description("Filter by collection source")
                .default(ParamValue::List(vec![]))
                .choices(source_options),
        )
        .param(
            "artist",
            ParamBuilder::text()
                .label("Artist Name")
                .description("Full or partial artist name")
                .default(ParamValue::Text(String::new())),
        )
        .param(
            "title",
            ParamBuilder::text()
                .label("Work Title")
                .description("Full or partial work title")
                .default(ParamValue::Text(String::new())),
        )
        .param(
            "inventory_number",
            ParamBuilder::text()
                .label("Inventory Number")
                .description("Full or partial inventory number")
                .default(ParamValue::Text(String::new())),
        )
        .param(
            "year_range",
            ParamBuilder::range()
                .label("Year Range")
                .description("Filter by year period")
                .default(ParamValue::Range(None, None))
                .min_value(1000.0)
                .max_value(2100.0),
        )
        .build();

    registry.register(&name, metadata, move || {
        Box::new(MetadataFilterOperator {
            backends: backends.clone(),
            settings: settings.clone(),
        })
    });
}

fn register_semantic_search(
    registry: &mut OperatorRegistry,
    backends: SearchBackends,
    settings: Arc<Settings>,
) {
    let (name, metadata) = with_result_mode_params(
        OperatorBuilder::new(names::SEMANTIC_SEARCH)
            .icon("search")
            .description("Text-based semantic search using AI")
            .param(
                "query_text",
                ParamBuilder::textarea()
                    .label("Search Text")
                    .description("Enter text to search for (required)")
                    .default(ParamValue::Text(String::new()))
                    .required(),
            ),
    )
    .build();

    registry.register(&name, metadata, move || {
        Box::new(SemanticSearchOperator {
            backends: backends.clone(),
            settings: settings.clone(),
        })
    });
}

fn register_similarity_search(
    registry: &mut OperatorRegistry,
    backends: SearchBackends,
    settings: Arc<Settings>,
) {
    let (name, metadata) = with_result_mode_params(
        OperatorBuilder::new(names::SIMILARITY_SEARCH)
            .icon("image_search")
            .description("Find similar artworks by uploading an image")
            .param(
                "query_image",
                ParamBuilder::image()
                    .label("Query Image")
                    .description("Upload an image to search for similar artworks (required)")
                    .required(),
            ),
    )
    .build();

    registry.register(&name, metadata, move || {
        Box::new(SimilaritySearchOperator {
            backends: backends.clone(),
            settings: settings.clone(),
        })
    });
}

fn register_pose_search(registry: &mut OperatorRegistry) {
    let (name, metadata) = OperatorBuilder::new(names::POSE_SEARCH)
        .icon("accessibility_new")
        .description("Find artworks with similar human poses")
        .param(
            "pose",
            ParamBuilder::text()
                .label("Pose Description")
                .description("Describe the body pose or posture (e.g., \"Standing figures\", \"Seated person\")")
                .default(ParamValue::Text(String::new()))
                .required(),
        )
        .param(
            "confidence",
            ParamBuilder::number()
                .label("Confidence Threshold")
                .description("Minimum AI confidence level for pose detection")
                .default(ParamValue::Float(0.7))
                .min_value(0.0)
                .max_value(1.0),
        )
        .build();

    registry.register(&name, metadata, || {
        Box::new(PlaceholderOperator {
            name: names::POSE_SEARCH,
            required_param: "pose",
            missing_message: "Pose description is required",
            loading: "Detecting poses in artworks...",
        })
    });
}

fn register_sketch_search(registry: &mut OperatorRegistry) {
    let (name, metadata) = OperatorBuilder::new(names::SKETCH_SEARCH)
        .icon("brush")
        .description("Search by drawing or uploading a sketch")
        .param(
            "sketch_data",
            ParamBuilder::image()
                .label("Sketch")
                .description("Draw a rough sketch of the composition you are looking for")
                .required(),
        )
        .build();

    registry.register(&name, metadata, || {
        Box::new(PlaceholderOperator {
            name: names::SKETCH_SEARCH,
            required_param: "sketch_data",
            missing_message: "Sketch is required",
            loading: "Analyzing sketch and searching...",
        })
    });
}

fn register_color_search(registry: &mut OperatorRegistry) {
    let (name, metadata) = OperatorBuilder::new(names::COLOR_SEARCH)
        .icon("palette")
        .description("Find artworks by dominant colors or color palette")
        .param(
            "colors",
            ParamBuilder::multiselect()
                .label("Colors")
                .description("Select one or more colors to search for")
                .default(ParamValue::List(vec![]))
                .choices([
                    "Red", "Orange", "Yellow", "Green", "Blue", "Purple", "Pink", "Brown",
                    "Black", "White", "Gray",
                ])
                .required(),
        )
        .param(
            "color_tolerance",
            ParamBuilder::number()
                .label("Color Tolerance")
                .description("How closely colors must match (0 = exact, 1 = loose)")
                .default(ParamValue::Float(0.3))
                .min_value(0.0)
                .max_value(1.0),
        )
        .build();

    registry.register(&name, metadata, || {
        Box::new(PlaceholderOperator {
            name: names::COLOR_SEARCH,
            required_param: "colors",
            missing_message: "At least one color must be selected",
            loading: "Analyzing color palettes...",
        })
    });
}
