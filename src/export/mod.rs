mod districts;
mod owners;

pub use districts::filtered_properties_with_district;
pub use owners::properties_with_owners;

use crate::repository::RepositoryError;

/// Errors raised while building an export document.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("failed to serialize owners export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to serialize district export: {0}")]
    Xml(#[from] quick_xml::SeError),
}
