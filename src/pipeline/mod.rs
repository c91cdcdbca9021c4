pub mod operator;
pub mod operators;
pub mod params;
pub mod preview;
pub mod queries;
pub mod registry;
pub mod result_mode;
pub mod schema;
pub mod state;
pub mod summary; // Compact parameter display for pipeline chips

use thiserror::Error;

use crate::backend::BackendError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unknown operator '{name}'. Available operators: {available}")]
    UnknownOperator { name: String, available: String },

    #[error("No operator instance with id '{0}' in the pipeline")]
    UnknownInstance(String),

    #[error("Invalid value for parameter '{param}': {problem}")]
    InvalidParam { param: String, problem: String },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Pipeline serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
