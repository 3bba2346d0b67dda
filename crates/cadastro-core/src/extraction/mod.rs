//! Regex-based field extraction for costing and investment documents.
//!
//! Each [`DocumentCategory`] owns a [`FieldCatalog`]: an ordered table of
//! field names and patterns. The [`FieldExtractionEngine`] applies every
//! pattern of a catalog to a document's text and keeps only the fields
//! that matched at least once.

pub mod catalog;
mod engine;

pub use catalog::{CatalogSet, CompiledField, FieldCatalog, FieldPattern};
pub use engine::{extract_fields, FieldExtractionEngine};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Document category, which selects the field catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    /// Costing (loan/financing) request.
    Custeio,
    /// Investment record.
    Investimento,
}

impl DocumentCategory {
    /// All categories, in analysis order.
    pub const ALL: [DocumentCategory; 2] = [DocumentCategory::Custeio, DocumentCategory::Investimento];

    /// Tag used in reports and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Custeio => "custeio",
            DocumentCategory::Investimento => "investimento",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "custeio" => Ok(DocumentCategory::Custeio),
            "investimento" => Ok(DocumentCategory::Investimento),
            other => Err(CatalogError::UnknownCategory(other.to_string())),
        }
    }
}

/// Matches of a single field in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatch {
    /// Field name.
    pub campo: String,
    /// Pattern text that produced the matches.
    pub padrao: String,
    /// Captured values in order of appearance, capped by the engine.
    pub exemplos: Vec<String>,
}

/// Fields identified in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Document category.
    pub tipo: DocumentCategory,
    /// Fields with at least one match, in catalog order.
    pub campos_identificados: Vec<FieldMatch>,
}

impl DocumentReport {
    /// Create a report with no identified fields.
    pub fn empty(tipo: DocumentCategory) -> Self {
        Self {
            tipo,
            campos_identificados: Vec::new(),
        }
    }

    /// Look up a field by name.
    pub fn field(&self, campo: &str) -> Option<&FieldMatch> {
        self.campos_identificados.iter().find(|m| m.campo == campo)
    }

    /// Number of identified fields.
    pub fn len(&self) -> usize {
        self.campos_identificados.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campos_identificados.is_empty()
    }
}

/// Reports of a full analysis run, keyed by category.
///
/// Serializes as `{"custeio": {...}, "investimento": {...}}`; a category
/// that was not analyzed is left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custeio: Option<DocumentReport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investimento: Option<DocumentReport>,
}

impl AnalysisReport {
    /// Store a report under its own category, replacing any previous one.
    pub fn insert(&mut self, report: DocumentReport) {
        match report.tipo {
            DocumentCategory::Custeio => self.custeio = Some(report),
            DocumentCategory::Investimento => self.investimento = Some(report),
        }
    }

    /// Report for a category, if it was analyzed.
    pub fn get(&self, category: DocumentCategory) -> Option<&DocumentReport> {
        match category {
            DocumentCategory::Custeio => self.custeio.as_ref(),
            DocumentCategory::Investimento => self.investimento.as_ref(),
        }
    }

    /// Pretty JSON with 2-space indentation; non-ASCII text is kept as is.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report as UTF-8 JSON.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = self.to_json_pretty()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
