//! The strategy contract every search operator implements.

use crate::models::ArtworkSummary;

use super::params::ParamBag;
use super::PipelineError;

/// Bounded preview plus the total match count behind it.
///
/// The total is computed over the full filtered candidate set before the
/// preview is cut, so `total >= preview.len()` always holds.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub preview: Vec<ArtworkSummary>,
    pub total: usize,
}

impl SearchOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// A pluggable search strategy.
///
/// Expected no-result conditions (nothing matched, a required input turned
/// out blank, captioning produced nothing) return the empty outcome; only
/// genuinely unexpected failures (transport, decoding) surface as errors,
/// and those are handled at the preview-coordinator boundary.
pub trait Operator {
    /// Display name, as registered in the operator catalog.
    fn name(&self) -> &str;

    /// Run the search with the instance's parameter bag.
    fn execute(&self, params: &ParamBag) -> Result<SearchOutcome, PipelineError>;

    /// Cheap readiness check, used to gate execution before any external
    /// call is attempted.
    fn is_configured(&self, params: &ParamBag) -> bool;

    /// Operator-specific parameter problems, empty when acceptable.
    fn validate_params(&self, _params: &ParamBag) -> Vec<String> {
        Vec::new()
    }

    /// Shown while the search runs.
    fn loading_message(&self) -> &str {
        "Loading results..."
    }

    /// Shown when `is_configured` says no.
    fn unconfigured_message(&self) -> String {
        format!("Please configure the {} first", self.name())
    }
}

impl std::fmt::Debug for dyn Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator")
            .field("name", &self.name())
            .finish()
    }
}
