//! CLI command implementations.

pub mod analyze;
pub mod clients;
pub mod config;
pub mod costings;
pub mod documents;
pub mod extract;
pub mod generate;
pub mod investments;
pub mod stats;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use cadastro_core::models::config::CadastroConfig;
use cadastro_core::RecordStore;

/// Settings shared by every command.
pub struct Context {
    pub config: CadastroConfig,
    database: Option<PathBuf>,
}

impl Context {
    /// Load the configuration from `config_path`, or from the default location
    /// when it exists.
    pub fn new(config_path: Option<&str>, database: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => CadastroConfig::from_file(Path::new(path))?,
            None => {
                let default_path = config::default_config_path();
                if default_path.exists() {
                    debug!("Using config file {}", default_path.display());
                    CadastroConfig::from_file(&default_path)?
                } else {
                    CadastroConfig::default()
                }
            }
        };

        Ok(Self { config, database })
    }

    /// Open the record store named by `--database` or the configuration.
    pub fn store(&self) -> anyhow::Result<RecordStore> {
        let mut storage = self.config.storage.clone();
        if let Some(database) = &self.database {
            storage.database_path = database.clone();
        }

        debug!("Opening database {}", storage.database_path.display());
        Ok(RecordStore::from_config(&storage)?)
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ListFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// Print records as a JSON array or as CSV with a header row.
pub fn print_records<T: Serialize>(records: &[T], format: ListFormat) -> anyhow::Result<()> {
    match format {
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        ListFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            for record in records {
                wtr.serialize(record)?;
            }
            let data = String::from_utf8(wtr.into_inner()?)?;
            print!("{}", data);
        }
    }

    Ok(())
}

/// Print a single record as pretty JSON.
pub fn print_record<T: Serialize>(record: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

/// Parse a `--valor` style argument.
pub fn parse_valor(s: &str) -> Result<rust_decimal::Decimal, String> {
    cadastro_core::amounts::parse_amount(s).ok_or_else(|| format!("invalid amount: {}", s))
}
