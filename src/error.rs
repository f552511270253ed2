use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("failed to extract PDF text: {0}")]
    PdfExtract(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("document has no pages")]
    NoPages,

    #[error("order header is missing the {field} field")]
    MissingMetadata { field: &'static str },

    #[error("table on page {page} starts with a line that is not item {expected}: '{line}'")]
    MalformedAnchor {
        page: u32,
        expected: u32,
        line: String,
    },

    #[error("failed to process '{}': {source}", path.display())]
    Document {
        path: PathBuf,
        source: Box<ExtractError>,
    },
}
