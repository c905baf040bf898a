use crate::config::ConfigError;
use crate::export::ExportError;
use crate::import::ImportError;
use crate::telemetry::TelemetryError;

/// Top-level error for the console entry point.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("import error: {0}")]
    Import(#[from] ImportError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
}
