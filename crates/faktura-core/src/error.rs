use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error)]
pub enum FakturaError {
    #[error("no readable table found in document")]
    ExtractionEmpty,

    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("discount percentage {0} is outside the valid range 0-100")]
    InvalidDiscount(Decimal),

    #[error("invalid role mapping: {0}")]
    InvalidRoleMapping(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
