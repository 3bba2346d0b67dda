//! Core library for client records and loan/investment document analysis.
//!
//! This crate provides:
//! - PDF text layer extraction that never fails past its boundary
//! - Regex field catalogs for costing ("custeio") and investment documents
//! - A field extraction engine producing per-document reports
//! - A SQLite record store for clients, documents, costings and investments
//! - Fixed-template client reports

pub mod amounts;
pub mod error;
pub mod extraction;
pub mod models;
pub mod pdf;
pub mod records;
pub mod render;

pub use error::{CadastroError, CatalogError, PdfError, RecordError, Result};
pub use extraction::{
    extract_fields, AnalysisReport, CatalogSet, DocumentCategory, DocumentReport, FieldCatalog,
    FieldExtractionEngine, FieldMatch, FieldPattern,
};
pub use models::config::CadastroConfig;
pub use pdf::{extract_text_or_empty, read_text_or_empty, PdfExtractor, PdfProcessor};
pub use records::RecordStore;
pub use render::{generate_report, DocumentRenderer, GeneratedReport, TextRenderer};
