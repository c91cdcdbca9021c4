pub mod artwork;
pub mod filters;

pub use artwork::{ArtworkRecord, ArtworkSummary};
pub use filters::ArtworkFilter;
