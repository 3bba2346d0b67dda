//! Error types for the cadastro-core library.

use thiserror::Error;

/// Main error type for the cadastro library.
#[derive(Error, Debug)]
pub enum CadastroError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Field catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Record store error.
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The source could not be read.
    #[error("failed to read PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building a field pattern catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A pattern failed to compile.
    #[error("invalid pattern for {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// A pattern has more than one capture group.
    #[error("pattern for {field} has {groups} capture groups, at most one is allowed")]
    TooManyGroups { field: String, groups: usize },

    /// The same field name appears twice in one catalog.
    #[error("duplicate field in catalog: {0}")]
    DuplicateField(String),

    /// Unknown document category name.
    #[error("unknown document category: {0}")]
    UnknownCategory(String),
}

/// Errors related to the record store.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The requested record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The input was rejected before reaching the store.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system error while handling uploads or generated documents.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the cadastro library.
pub type Result<T> = std::result::Result<T, CadastroError>;
