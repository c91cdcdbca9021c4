//! Application settings.
//!
//! Every field has a working default and can be overridden through a
//! `HENSOR_`-prefixed environment variable (e.g. `HENSOR_IMAGE_BASE_URL`,
//! `HENSOR_PREVIEW_RESULTS_COUNT`). Unparseable overrides fall back to the
//! default with a warning rather than aborting startup.

use tracing_subscriber::EnvFilter;

/// Application-level constants
pub const APP_NAME: &str = "Hensor Workbench";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of candidates requested from the vector index before any
/// result-mode filtering is applied.
pub const CANDIDATE_POOL_SIZE: usize = 1000;

/// Runtime settings for the search engine and its collaborators.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL prefixed to relative artwork image paths.
    pub image_base_url: String,
    /// Number of results shown in an operator preview (2 rows x 5 columns).
    /// Clamped to 1..=100.
    pub preview_results_count: usize,
    /// Source-collection options offered by the Metadata Filter operator.
    pub source_collections: Vec<String>,
    /// Base URL of the artwork REST API (vector search RPC + metadata queries).
    pub rest_base_url: String,
    /// API key sent with artwork REST requests (empty = unauthenticated).
    pub rest_api_key: String,
    /// OpenAI-compatible chat-completions endpoint used for image captioning.
    pub vision_api_url: String,
    /// API key for the vision endpoint.
    pub vision_api_key: String,
    /// Vision model name.
    pub vision_model: String,
    /// HTTP timeout for collaborator calls, in seconds.
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_base_url: "https://www.opac-fabritius.be".to_string(),
            preview_results_count: 10,
            source_collections: vec!["KMSKA".to_string(), "Other".to_string()],
            rest_base_url: "http://localhost:8000".to_string(),
            rest_api_key: String::new(),
            vision_api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            vision_api_key: String::new(),
            vision_model: "gpt-4o".to_string(),
            http_timeout_secs: 60,
        }
    }
}

impl Settings {
    /// Build settings from the environment, starting from defaults.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(url) = std::env::var("HENSOR_IMAGE_BASE_URL") {
            settings.image_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(raw) = std::env::var("HENSOR_PREVIEW_RESULTS_COUNT") {
            match raw.parse::<usize>() {
                Ok(n) => settings.preview_results_count = n,
                Err(_) => tracing::warn!(
                    value = %raw,
                    "Invalid HENSOR_PREVIEW_RESULTS_COUNT, keeping default"
                ),
            }
        }
        if let Ok(raw) = std::env::var("HENSOR_SOURCE_COLLECTIONS") {
            settings.source_collections = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(url) = std::env::var("HENSOR_REST_BASE_URL") {
            settings.rest_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(key) = std::env::var("HENSOR_REST_API_KEY") {
            settings.rest_api_key = key;
        }
        if let Ok(url) = std::env::var("HENSOR_VISION_API_URL") {
            settings.vision_api_url = url;
        }
        if let Ok(key) = std::env::var("HENSOR_VISION_API_KEY") {
            settings.vision_api_key = key;
        }
        if let Ok(model) = std::env::var("HENSOR_VISION_MODEL") {
            settings.vision_model = model;
        }
        if let Ok(raw) = std::env::var("HENSOR_HTTP_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(n) => settings.http_timeout_secs = n,
                Err(_) => tracing::warn!(
                    value = %raw,
                    "Invalid HENSOR_HTTP_TIMEOUT_SECS, keeping default"
                ),
            }
        }

        settings.preview_results_count = settings.preview_results_count.clamp(1, 100);
        settings
    }
}

/// Default log filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Initialize tracing for binaries and integration harnesses.
///
/// Library consumers that install their own subscriber should skip this.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", APP_NAME, APP_VERSION);
}
