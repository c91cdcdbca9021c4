//! Preview coordination: one operator instance in, one terminal state out.
//!
//! Per request the flow is
//!
//! ```text
//! Idle -> Unconfigured                      (readiness gate says no)
//! Idle -> Loading -> Empty                  (executed, zero matches)
//! Idle -> Loading -> Populated              (executed, results)
//! Idle -> Loading -> Error                  (collaborator failure)
//! ```
//!
//! The readiness gate runs before anything touches the network, so an
//! unconfigured operator costs no collaborator calls. This is the single
//! place where execution failures are caught; operators below it only
//! return errors for genuinely unexpected conditions, and the raw message
//! is surfaced verbatim.
//!
//! Requests target exactly one instance; pipeline order has no influence
//! on execution, only on presentation and save files.

use crate::models::ArtworkSummary;

use super::registry::OperatorRegistry;
use super::state::PipelineState;
use super::PipelineError;

/// Terminal state of one preview request.
#[derive(Debug, Clone)]
pub enum PreviewState {
    /// Required input is missing; the operator-specific hint is included.
    Unconfigured { message: String },
    /// Executed fine, nothing matched. Distinct from failure.
    Empty,
    /// Bounded preview plus the total match count behind it.
    Populated {
        preview: Vec<ArtworkSummary>,
        total: usize,
    },
    /// A collaborator failed; the raw message is shown to the user.
    Error { message: String },
}

/// Executes preview requests against one registry.
pub struct PreviewCoordinator<'a> {
    registry: &'a OperatorRegistry,
}

impl<'a> PreviewCoordinator<'a> {
    pub fn new(registry: &'a OperatorRegistry) -> Self {
        Self { registry }
    }

    /// Run a preview for the given operator instance.
    ///
    /// A missing instance or unregistered operator name is an `Err`: both
    /// mean the caller's pipeline and registry disagree, which no banner
    /// can fix. Execution failures come back as `PreviewState::Error`.
    ///
    /// On success (including zero matches) the instance's cached result
    /// count is updated before the state is returned, so the pipeline
    /// summary and the preview can never disagree.
    pub fn preview(
        &self,
        state: &mut PipelineState,
        instance_id: &str,
    ) -> Result<PreviewState, PipelineError> {
        let instance = state
            .get_operator(instance_id)
            .ok_or_else(|| PipelineError::UnknownInstance(instance_id.to_string()))?;
        tracing::info!(operator = %instance.name, instance = instance_id, "Preview requested");

        let operator = self.registry.create(&instance.name)?;

        if !operator.is_configured(&instance.params) {
            tracing::info!(operator = %instance.name, "Operator not configured, skipping execution");
            return Ok(PreviewState::Unconfigured {
                message: operator.unconfigured_message(),
            });
        }

        match operator.execute(&instance.params) {
            Ok(outcome) => {
                state.update_result_count(instance_id, outcome.total);
                if outcome.is_empty() {
                    Ok(PreviewState::Empty)
                } else {
                    Ok(PreviewState::Populated {
                        preview: outcome.preview,
                        total: outcome.total,
                    })
                }
            }
            Err(error) => {
                tracing::error!(operator = %instance.name, %error, "Operator execution failed");
                Ok(PreviewState::Error {
                    message: error.to_string(),
                })
            }
        }
    }

    /// The operator-specific text to show while a request is in flight.
    pub fn loading_message(&self, operator_name: &str) -> Result<String, PipelineError> {
        Ok(self.registry.create(operator_name)?.loading_message().to_string())
    }
}
