pub mod curriculum;
pub mod profile;

use thiserror::Error;

pub use curriculum::{CatalogFilter, CurriculumCatalog, CurriculumSummary};
pub use profile::{InMemoryProfileStore, ProfileStore, StudentProfile};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
