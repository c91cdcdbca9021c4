pub mod caption;
pub mod memory;
pub mod rest;
pub mod types;

use std::sync::Arc;

use thiserror::Error;

pub use caption::VisionCaptioner;
pub use memory::{FixedCaptioner, InMemoryArtworkStore};
pub use rest::RestArtworkStore;
pub use types::{ImageCaptioner, MetadataStore, ScoredHit, VectorSearch};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    Decode(String),

    #[error("Invalid image payload: {0}")]
    InvalidImage(String),
}

/// Shared handles to the three external collaborators the search
/// operators talk to. Cheap to clone; one set per process is typical.
#[derive(Clone)]
pub struct SearchBackends {
    pub vector: Arc<dyn VectorSearch>,
    pub metadata: Arc<dyn MetadataStore>,
    pub captioner: Arc<dyn ImageCaptioner>,
}
