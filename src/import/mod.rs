pub mod citizens;
pub mod districts;

use crate::repository::RepositoryError;

/// The single line reported for every rejected record or sub-record. The
/// rejection taxonomy (constraint violation, duplicate key, date parse,
/// unresolved reference) is deliberately not surfaced to report consumers.
pub(crate) const REJECTED_LINE: &str = "Invalid Data!";

/// Errors that abort an entire import batch. Record-level problems never
/// surface here; they become report lines instead.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read import batch: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed district document: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("malformed citizen document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Line-per-record outcome report accumulated while an import batch runs.
#[derive(Debug, Default)]
pub(crate) struct ImportReport {
    lines: Vec<String>,
}

impl ImportReport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn rejected(&mut self) {
        self.lines.push(REJECTED_LINE.to_string());
    }

    pub(crate) fn accepted(&mut self, line: String) {
        self.lines.push(line);
    }

    pub(crate) fn render(self) -> String {
        self.lines.join("\n").trim_end().to_string()
    }
}
