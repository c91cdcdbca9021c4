//! Museum-collection search pipeline engine.
//!
//! Users assemble an ordered pipeline of configurable search operators
//! (metadata filtering, semantic text search, image-similarity search),
//! preview one operator at a time and save the arrangement as JSON. The
//! heavy lifting (vector index, artwork store, image captioning) lives
//! behind narrow collaborator traits in [`backend`].
//!
//! Typical assembly:
//!
//! ```no_run
//! use std::sync::Arc;
//! use hensor::backend::{RestArtworkStore, SearchBackends, VisionCaptioner};
//! use hensor::config::Settings;
//! use hensor::pipeline::operators::{names, register_builtin_operators};
//! use hensor::pipeline::preview::PreviewCoordinator;
//! use hensor::pipeline::registry::OperatorRegistry;
//! use hensor::pipeline::state::PipelineState;
//!
//! let settings = Arc::new(Settings::from_env());
//! let store = Arc::new(RestArtworkStore::from_settings(&settings));
//! let backends = SearchBackends {
//!     vector: store.clone(),
//!     metadata: store,
//!     captioner: Arc::new(VisionCaptioner::from_settings(&settings)),
//! };
//!
//! let mut registry = OperatorRegistry::new();
//! register_builtin_operators(&mut registry, backends, settings);
//!
//! let mut pipeline = PipelineState::new();
//! let id = pipeline.add_operator(names::SEMANTIC_SEARCH, &registry).unwrap();
//! let coordinator = PreviewCoordinator::new(&registry);
//! println!("{:?}", coordinator.preview(&mut pipeline, &id).unwrap());
//! ```

pub mod backend;
pub mod config;
pub mod models;
pub mod pipeline;

pub use config::{init_tracing, Settings};
pub use models::{ArtworkFilter, ArtworkRecord, ArtworkSummary};
pub use pipeline::operator::{Operator, SearchOutcome};
pub use pipeline::preview::{PreviewCoordinator, PreviewState};
pub use pipeline::registry::OperatorRegistry;
pub use pipeline::state::{OperatorInstance, PipelineState};
pub use pipeline::PipelineError;
