pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod import;
pub mod repository;
pub mod telemetry;

mod validation;

pub use error::AppError;
pub use export::{filtered_properties_with_district, properties_with_owners, ExportError};
pub use import::{citizens::CitizenImporter, districts::DistrictImporter, ImportError};
pub use repository::{CadastreRepository, InMemoryCadastre, RepositoryError};
