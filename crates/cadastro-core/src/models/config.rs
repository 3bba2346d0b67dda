//! Configuration structures for extraction and record storage.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CadastroError;
use crate::extraction::{CatalogSet, FieldExtractionEngine};

/// Main configuration for cadastro.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CadastroConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Record storage configuration.
    pub storage: StorageConfig,

    /// Analysis output configuration.
    pub output: OutputConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum examples kept per identified field.
    pub max_examples: usize,

    /// JSON file with custom field catalogs (built-in catalogs if unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_examples: FieldExtractionEngine::DEFAULT_MAX_EXAMPLES,
            catalog_file: None,
        }
    }
}

impl ExtractionConfig {
    /// Engine configured with these settings.
    pub fn engine(&self) -> FieldExtractionEngine {
        FieldExtractionEngine::new().with_max_examples(self.max_examples)
    }

    /// Catalogs from `catalog_file`, or the built-in ones.
    pub fn catalogs(&self) -> crate::Result<CatalogSet> {
        match &self.catalog_file {
            Some(path) => CatalogSet::from_file(path),
            None => Ok(CatalogSet::builtin()),
        }
    }
}

/// Record storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Directory for uploaded and generated documents.
    pub upload_dir: PathBuf,

    /// Largest accepted upload in bytes.
    pub max_upload_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("cadastro.db"),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Analysis output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where `analyze` writes its JSON report.
    pub analysis_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            analysis_file: PathBuf::from("document_analysis.json"),
        }
    }
}

impl CadastroConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| CadastroError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
