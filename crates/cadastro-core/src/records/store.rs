//! SQLite record store.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::uploads::secure_filename;
use super::Result;
use crate::error::RecordError;
use crate::models::config::StorageConfig;
use crate::models::records::*;

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS clientes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nome_completo TEXT NOT NULL,
        cpf_cnpj TEXT NOT NULL UNIQUE,
        endereco TEXT,
        telefone TEXT,
        email TEXT,
        data_cadastro TEXT NOT NULL,
        observacoes TEXT
    );

    CREATE TABLE IF NOT EXISTS documentos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        cliente_id INTEGER NOT NULL REFERENCES clientes(id) ON DELETE CASCADE,
        nome_arquivo TEXT NOT NULL,
        tipo_documento TEXT NOT NULL DEFAULT 'outro',
        data_upload TEXT NOT NULL,
        caminho_arquivo TEXT NOT NULL,
        observacoes TEXT
    );

    CREATE TABLE IF NOT EXISTS custeios (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        cliente_id INTEGER NOT NULL REFERENCES clientes(id) ON DELETE CASCADE,
        valor TEXT,
        finalidade TEXT,
        prazo TEXT,
        taxa_juros TEXT,
        garantia TEXT,
        data_solicitacao TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pendente',
        observacoes TEXT
    );

    CREATE TABLE IF NOT EXISTS investimentos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        cliente_id INTEGER NOT NULL REFERENCES clientes(id) ON DELETE CASCADE,
        valor_investimento TEXT,
        tipo_investimento TEXT,
        prazo_investimento TEXT,
        rentabilidade TEXT,
        objetivo TEXT,
        data_inicio TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'ativo',
        observacoes TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_documentos_cliente ON documentos(cliente_id);
    CREATE INDEX IF NOT EXISTS idx_custeios_cliente ON custeios(cliente_id);
    CREATE INDEX IF NOT EXISTS idx_investimentos_cliente ON investimentos(cliente_id);
"#;

const CLIENT_COLUMNS: &str =
    "id, nome_completo, cpf_cnpj, endereco, telefone, email, data_cadastro, observacoes";
const DOCUMENT_COLUMNS: &str =
    "id, cliente_id, nome_arquivo, tipo_documento, data_upload, caminho_arquivo, observacoes";
const COSTING_COLUMNS: &str = "id, cliente_id, valor, finalidade, prazo, taxa_juros, garantia, \
     data_solicitacao, status, observacoes";
const INVESTMENT_COLUMNS: &str = "id, cliente_id, valor_investimento, tipo_investimento, \
     prazo_investimento, rentabilidade, objetivo, data_inicio, status, observacoes";

/// Record store holding the database connection and upload settings.
pub struct RecordStore {
    conn: Connection,
    upload_dir: PathBuf,
    max_upload_bytes: u64,
}

impl RecordStore {
    /// Open (or create) a database file.
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Open the database and upload directory named by the configuration.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        Ok(Self::open(&config.database_path)?
            .with_uploads(config.upload_dir.clone(), config.max_upload_bytes))
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        let defaults = StorageConfig::default();
        Ok(Self {
            conn,
            upload_dir: defaults.upload_dir,
            max_upload_bytes: defaults.max_upload_bytes,
        })
    }

    /// Set the upload directory and size limit.
    pub fn with_uploads(mut self, upload_dir: PathBuf, max_upload_bytes: u64) -> Self {
        self.upload_dir = upload_dir;
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Directory where uploaded and generated files are written.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    // ---- clients ----

    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM clientes ORDER BY id", CLIENT_COLUMNS))?;
        let clients = stmt
            .query_map([], client_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(clients)
    }

    pub fn create_client(&self, input: &ClientInput) -> Result<Client> {
        input.validate()?;

        self.conn
            .execute(
                "INSERT INTO clientes (nome_completo, cpf_cnpj, endereco, telefone, email, data_cadastro, observacoes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    input.nome_completo,
                    input.cpf_cnpj,
                    input.endereco,
                    input.telefone,
                    input.email,
                    Utc::now(),
                    input.observacoes,
                ],
            )
            .map_err(|e| duplicate_cpf(e, &input.cpf_cnpj))?;

        let id = self.conn.last_insert_rowid();
        info!("Created client {} ({})", id, input.cpf_cnpj);
        self.get_client(id)
    }

    pub fn get_client(&self, id: i64) -> Result<Client> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM clientes WHERE id = ?1", CLIENT_COLUMNS),
                params![id],
                client_from_row,
            )
            .optional()?
            .ok_or(RecordError::NotFound { entity: "client", id })
    }

    /// Replace every editable field of a client.
    pub fn update_client(&self, id: i64, input: &ClientInput) -> Result<Client> {
        input.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE clientes SET nome_completo = ?1, cpf_cnpj = ?2, endereco = ?3, telefone = ?4,
                 email = ?5, observacoes = ?6 WHERE id = ?7",
                params![
                    input.nome_completo,
                    input.cpf_cnpj,
                    input.endereco,
                    input.telefone,
                    input.email,
                    input.observacoes,
                    id,
                ],
            )
            .map_err(|e| duplicate_cpf(e, &input.cpf_cnpj))?;

        if changed == 0 {
            return Err(RecordError::NotFound { entity: "client", id });
        }

        info!("Updated client {}", id);
        self.get_client(id)
    }

    /// Delete a client together with its documents, costings and investments.
    pub fn delete_client(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM clientes WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(RecordError::NotFound { entity: "client", id });
        }

        info!("Deleted client {}", id);
        Ok(())
    }

    fn ensure_client(&self, id: i64) -> Result<()> {
        let exists = self
            .conn
            .query_row("SELECT 1 FROM clientes WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?;
        exists.ok_or(RecordError::NotFound { entity: "client", id })
    }

    // ---- documents ----

    pub fn list_documents(&self, cliente_id: i64) -> Result<Vec<Document>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM documentos WHERE cliente_id = ?1 ORDER BY id",
            DOCUMENT_COLUMNS
        ))?;
        let documents = stmt
            .query_map(params![cliente_id], document_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(documents)
    }

    /// Copy a file into the upload directory and record it for a client.
    ///
    /// The stored name is sanitized with [`secure_filename`]; an existing
    /// upload with the same name is overwritten.
    pub fn upload_document(
        &self,
        cliente_id: i64,
        source: &Path,
        tipo: DocumentKind,
        observacoes: Option<String>,
    ) -> Result<Document> {
        self.ensure_client(cliente_id)?;

        let original = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let filename = secure_filename(&original);
        if filename.is_empty() {
            return Err(RecordError::Invalid("no file selected".to_string()));
        }

        let size = fs::metadata(source)?.len();
        if size > self.max_upload_bytes {
            return Err(RecordError::Invalid(format!(
                "{} is {} bytes, limit is {}",
                original, size, self.max_upload_bytes
            )));
        }

        fs::create_dir_all(&self.upload_dir)?;
        let destination = self.upload_dir.join(&filename);
        fs::copy(source, &destination)?;
        debug!("Stored upload {} -> {}", source.display(), destination.display());

        self.conn.execute(
            "INSERT INTO documentos (cliente_id, nome_arquivo, tipo_documento, data_upload, caminho_arquivo, observacoes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                cliente_id,
                filename,
                tipo.as_str(),
                Utc::now(),
                destination.to_string_lossy().into_owned(),
                observacoes,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!("Recorded document {} for client {}", id, cliente_id);

        let document = self.conn.query_row(
            &format!("SELECT {} FROM documentos WHERE id = ?1", DOCUMENT_COLUMNS),
            params![id],
            document_from_row,
        )?;
        Ok(document)
    }

    // ---- costings ----

    pub fn list_costings(&self, cliente_id: i64) -> Result<Vec<Costing>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM custeios WHERE cliente_id = ?1 ORDER BY id",
            COSTING_COLUMNS
        ))?;
        let costings = stmt
            .query_map(params![cliente_id], costing_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(costings)
    }

    pub fn create_costing(&self, cliente_id: i64, input: &CostingInput) -> Result<Costing> {
        self.ensure_client(cliente_id)?;

        self.conn.execute(
            "INSERT INTO custeios (cliente_id, valor, finalidade, prazo, taxa_juros, garantia, data_solicitacao, status, observacoes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                cliente_id,
                input.valor.map(decimal_text),
                input.finalidade,
                input.prazo,
                input.taxa_juros,
                input.garantia,
                Utc::now(),
                CostingStatus::default().as_str(),
                input.observacoes,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!("Created costing {} for client {}", id, cliente_id);

        let costing = self.conn.query_row(
            &format!("SELECT {} FROM custeios WHERE id = ?1", COSTING_COLUMNS),
            params![id],
            costing_from_row,
        )?;
        Ok(costing)
    }

    // ---- investments ----

    pub fn list_investments(&self, cliente_id: i64) -> Result<Vec<Investment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM investimentos WHERE cliente_id = ?1 ORDER BY id",
            INVESTMENT_COLUMNS
        ))?;
        let investments = stmt
            .query_map(params![cliente_id], investment_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(investments)
    }

    pub fn create_investment(&self, cliente_id: i64, input: &InvestmentInput) -> Result<Investment> {
        self.ensure_client(cliente_id)?;

        self.conn.execute(
            "INSERT INTO investimentos (cliente_id, valor_investimento, tipo_investimento, prazo_investimento,
             rentabilidade, objetivo, data_inicio, status, observacoes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                cliente_id,
                input.valor_investimento.map(decimal_text),
                input.tipo_investimento,
                input.prazo_investimento,
                input.rentabilidade,
                input.objetivo,
                Utc::now(),
                InvestmentStatus::default().as_str(),
                input.observacoes,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!("Created investment {} for client {}", id, cliente_id);

        let investment = self.conn.query_row(
            &format!("SELECT {} FROM investimentos WHERE id = ?1", INVESTMENT_COLUMNS),
            params![id],
            investment_from_row,
        )?;
        Ok(investment)
    }

    // ---- statistics ----

    pub fn statistics(&self) -> Result<Statistics> {
        Ok(Statistics {
            total_clientes: self.count("clientes")?,
            total_custeios: self.count("custeios")?,
            total_investimentos: self.count("investimentos")?,
            total_documentos: self.count("documentos")?,
        })
    }

    fn count(&self, table: &str) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Map a uniqueness violation on `cpf_cnpj` to a conflict.
fn duplicate_cpf(err: rusqlite::Error, cpf_cnpj: &str) -> RecordError {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            RecordError::Conflict(format!("cpf_cnpj already registered: {}", cpf_cnpj))
        }
        other => RecordError::Database(other),
    }
}

/// Amounts are stored as text rounded to cents.
fn decimal_text(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| Decimal::from_str(&s))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parsed_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = RecordError>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        nome_completo: row.get(1)?,
        cpf_cnpj: row.get(2)?,
        endereco: row.get(3)?,
        telefone: row.get(4)?,
        email: row.get(5)?,
        data_cadastro: row.get(6)?,
        observacoes: row.get(7)?,
    })
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    let path: String = row.get(5)?;
    Ok(Document {
        id: row.get(0)?,
        cliente_id: row.get(1)?,
        nome_arquivo: row.get(2)?,
        tipo_documento: parsed_column(row, 3)?,
        data_upload: row.get(4)?,
        caminho_arquivo: PathBuf::from(path),
        observacoes: row.get(6)?,
    })
}

fn costing_from_row(row: &Row<'_>) -> rusqlite::Result<Costing> {
    Ok(Costing {
        id: row.get(0)?,
        cliente_id: row.get(1)?,
        valor: decimal_column(row, 2)?,
        finalidade: row.get(3)?,
        prazo: row.get(4)?,
        taxa_juros: row.get(5)?,
        garantia: row.get(6)?,
        data_solicitacao: row.get(7)?,
        status: parsed_column(row, 8)?,
        observacoes: row.get(9)?,
    })
}

fn investment_from_row(row: &Row<'_>) -> rusqlite::Result<Investment> {
    Ok(Investment {
        id: row.get(0)?,
        cliente_id: row.get(1)?,
        valor_investimento: decimal_column(row, 2)?,
        tipo_investimento: row.get(3)?,
        prazo_investimento: row.get(4)?,
        rentabilidade: row.get(5)?,
        objetivo: row.get(6)?,
        data_inicio: row.get(7)?,
        status: parsed_column(row, 8)?,
        observacoes: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> RecordStore {
        RecordStore::open_in_memory().unwrap()
    }

    fn maria() -> ClientInput {
        ClientInput {
            nome_completo: "Maria Silva".to_string(),
            cpf_cnpj: "123.456.789-00".to_string(),
            telefone: Some("(64) 99999-0000".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_client_crud() {
        let store = store();
        let created = store.create_client(&maria()).unwrap();
        assert_eq!(created.nome_completo, "Maria Silva");
        assert_eq!(store.get_client(created.id).unwrap(), created);

        let mut changes = maria();
        changes.email = Some("maria@fazenda.com.br".to_string());
        changes.telefone = None;
        let updated = store.update_client(created.id, &changes).unwrap();
        assert_eq!(updated.email.as_deref(), Some("maria@fazenda.com.br"));
        assert_eq!(updated.telefone, None);
        assert_eq!(updated.data_cadastro, created.data_cadastro);

        assert_eq!(store.list_clients().unwrap().len(), 1);
        store.delete_client(created.id).unwrap();
        assert!(store.list_clients().unwrap().is_empty());
    }

    #[test]
    fn test_missing_client_is_not_found() {
        let store = store();
        assert!(matches!(
            store.get_client(42),
            Err(RecordError::NotFound { entity: "client", id: 42 })
        ));
        assert!(matches!(store.update_client(42, &maria()), Err(RecordError::NotFound { .. })));
        assert!(matches!(store.delete_client(42), Err(RecordError::NotFound { .. })));
        assert!(matches!(
            store.create_costing(42, &CostingInput::default()),
            Err(RecordError::NotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_cpf_is_conflict() {
        let store = store();
        store.create_client(&maria()).unwrap();
        let err = store.create_client(&maria()).unwrap_err();
        assert!(matches!(err, RecordError::Conflict(_)));
    }

    #[test]
    fn test_required_fields() {
        let store = store();
        let err = store.create_client(&ClientInput::new("", "1")).unwrap_err();
        assert!(matches!(err, RecordError::Invalid(_)));
    }

    #[test]
    fn test_costings_and_investments() {
        let store = store();
        let client = store.create_client(&maria()).unwrap();

        let costing = store
            .create_costing(
                client.id,
                &CostingInput {
                    valor: Some(Decimal::new(150_000_456, 3)),
                    finalidade: Some("Custeio de soja".to_string()),
                    prazo: Some("12 meses".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(costing.status, CostingStatus::Pendente);
        assert_eq!(costing.valor, Some(Decimal::new(15_000_046, 2)));

        let investment = store
            .create_investment(
                client.id,
                &InvestmentInput {
                    valor_investimento: Some(Decimal::new(25_000_000, 2)),
                    tipo_investimento: Some("Pecuário".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(investment.status, InvestmentStatus::Ativo);

        assert_eq!(store.list_costings(client.id).unwrap(), vec![costing]);
        assert_eq!(store.list_investments(client.id).unwrap(), vec![investment]);
        assert!(store.list_costings(client.id + 1).unwrap().is_empty());
    }

    #[test]
    fn test_upload_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store().with_uploads(dir.path().join("uploads"), 1024);
        let client = store.create_client(&maria()).unwrap();

        let source = dir.path().join("Custeio Maria 05 07 24.pdf");
        fs::write(&source, b"%PDF-1.4").unwrap();

        let doc = store
            .upload_document(client.id, &source, DocumentKind::Custeio, None)
            .unwrap();
        assert_eq!(doc.nome_arquivo, "Custeio_Maria_05_07_24.pdf");
        assert_eq!(doc.tipo_documento, DocumentKind::Custeio);
        assert!(doc.caminho_arquivo.exists());
        assert_eq!(store.list_documents(client.id).unwrap(), vec![doc]);
    }

    #[test]
    fn test_upload_limits() {
        let dir = tempfile::tempdir().unwrap();
        let store = store().with_uploads(dir.path().join("uploads"), 4);
        let client = store.create_client(&maria()).unwrap();

        let big = dir.path().join("grande.pdf");
        fs::write(&big, b"0123456789").unwrap();
        assert!(matches!(
            store.upload_document(client.id, &big, DocumentKind::Outro, None),
            Err(RecordError::Invalid(_))
        ));

        let unnamed = dir.path().join("...");
        assert!(matches!(
            store.upload_document(client.id, &unnamed, DocumentKind::Outro, None),
            Err(RecordError::Invalid(_))
        ));
    }

    #[test]
    fn test_delete_cascades_and_statistics() {
        let dir = tempfile::tempdir().unwrap();
        let store = store().with_uploads(dir.path().join("uploads"), 1024);
        let client = store.create_client(&maria()).unwrap();
        let other = store.create_client(&ClientInput::new("João", "98.765.432/0001-10")).unwrap();

        let source = dir.path().join("contrato.pdf");
        fs::write(&source, b"%PDF").unwrap();
        store.upload_document(client.id, &source, DocumentKind::Outro, None).unwrap();
        store.create_costing(client.id, &CostingInput::default()).unwrap();
        store.create_investment(other.id, &InvestmentInput::default()).unwrap();

        assert_eq!(
            store.statistics().unwrap(),
            Statistics {
                total_clientes: 2,
                total_custeios: 1,
                total_investimentos: 1,
                total_documentos: 1,
            }
        );

        store.delete_client(client.id).unwrap();
        let stats = store.statistics().unwrap();
        assert_eq!(stats.total_clientes, 1);
        assert_eq!(stats.total_custeios, 0);
        assert_eq!(stats.total_documentos, 0);
        assert_eq!(stats.total_investimentos, 1);
    }

    #[test]
    fn test_reopen_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cadastro.db");
        {
            let store = RecordStore::open(&path).unwrap();
            store.create_client(&maria()).unwrap();
        }
        let store = RecordStore::open(&path).unwrap();
        assert_eq!(store.list_clients().unwrap()[0].cpf_cnpj, "123.456.789-00");
    }
}
