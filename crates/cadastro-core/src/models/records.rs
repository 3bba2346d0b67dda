//! Client record models: clients, documents, costing requests and investments.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// A registered client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,

    /// Full legal name.
    pub nome_completo: String,

    /// CPF (person) or CNPJ (company) number, unique per client.
    pub cpf_cnpj: String,

    pub endereco: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,

    /// Registration timestamp.
    pub data_cadastro: DateTime<Utc>,

    pub observacoes: Option<String>,
}

/// Editable client fields, used for both creation and full updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientInput {
    pub nome_completo: String,
    pub cpf_cnpj: String,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
}

impl ClientInput {
    pub fn new(nome_completo: impl Into<String>, cpf_cnpj: impl Into<String>) -> Self {
        Self {
            nome_completo: nome_completo.into(),
            cpf_cnpj: cpf_cnpj.into(),
            ..Default::default()
        }
    }

    /// Check that the required fields are present.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.nome_completo.trim().is_empty() {
            return Err(RecordError::Invalid("nome_completo is required".to_string()));
        }
        if self.cpf_cnpj.trim().is_empty() {
            return Err(RecordError::Invalid("cpf_cnpj is required".to_string()));
        }
        Ok(())
    }
}

/// Kind of an uploaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Custeio,
    Investimento,
    #[default]
    Outro,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Custeio => "custeio",
            DocumentKind::Investimento => "investimento",
            DocumentKind::Outro => "outro",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custeio" => Ok(DocumentKind::Custeio),
            "investimento" => Ok(DocumentKind::Investimento),
            "outro" => Ok(DocumentKind::Outro),
            other => Err(RecordError::Invalid(format!("unknown document type: {}", other))),
        }
    }
}

/// Metadata of a document uploaded for a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub cliente_id: i64,

    /// Sanitized file name.
    pub nome_arquivo: String,

    pub tipo_documento: DocumentKind,
    pub data_upload: DateTime<Utc>,

    /// Location of the stored copy.
    pub caminho_arquivo: PathBuf,

    pub observacoes: Option<String>,
}

/// Status of a costing request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostingStatus {
    #[default]
    Pendente,
    Aprovado,
    Rejeitado,
}

impl CostingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostingStatus::Pendente => "pendente",
            CostingStatus::Aprovado => "aprovado",
            CostingStatus::Rejeitado => "rejeitado",
        }
    }
}

impl FromStr for CostingStatus {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendente" => Ok(CostingStatus::Pendente),
            "aprovado" => Ok(CostingStatus::Aprovado),
            "rejeitado" => Ok(CostingStatus::Rejeitado),
            other => Err(RecordError::Invalid(format!("unknown costing status: {}", other))),
        }
    }
}

/// A costing ("custeio") loan request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Costing {
    pub id: i64,
    pub cliente_id: i64,

    /// Requested amount (BRL).
    pub valor: Option<Decimal>,

    pub finalidade: Option<String>,
    pub prazo: Option<String>,
    pub taxa_juros: Option<String>,
    pub garantia: Option<String>,
    pub data_solicitacao: DateTime<Utc>,
    pub status: CostingStatus,
    pub observacoes: Option<String>,
}

/// Fields supplied when creating a costing request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostingInput {
    pub valor: Option<Decimal>,
    pub finalidade: Option<String>,
    pub prazo: Option<String>,
    pub taxa_juros: Option<String>,
    pub garantia: Option<String>,
    pub observacoes: Option<String>,
}

/// Status of an investment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    #[default]
    Ativo,
    Finalizado,
    Cancelado,
}

impl InvestmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentStatus::Ativo => "ativo",
            InvestmentStatus::Finalizado => "finalizado",
            InvestmentStatus::Cancelado => "cancelado",
        }
    }
}

impl FromStr for InvestmentStatus {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ativo" => Ok(InvestmentStatus::Ativo),
            "finalizado" => Ok(InvestmentStatus::Finalizado),
            "cancelado" => Ok(InvestmentStatus::Cancelado),
            other => Err(RecordError::Invalid(format!("unknown investment status: {}", other))),
        }
    }
}

/// An investment held by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: i64,
    pub cliente_id: i64,

    /// Invested amount (BRL).
    pub valor_investimento: Option<Decimal>,

    pub tipo_investimento: Option<String>,
    pub prazo_investimento: Option<String>,
    pub rentabilidade: Option<String>,
    pub objetivo: Option<String>,
    pub data_inicio: DateTime<Utc>,
    pub status: InvestmentStatus,
    pub observacoes: Option<String>,
}

/// Fields supplied when creating an investment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentInput {
    pub valor_investimento: Option<Decimal>,
    pub tipo_investimento: Option<String>,
    pub prazo_investimento: Option<String>,
    pub rentabilidade: Option<String>,
    pub objetivo: Option<String>,
    pub observacoes: Option<String>,
}

/// Record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_clientes: u64,
    pub total_custeios: u64,
    pub total_investimentos: u64,
    pub total_documentos: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_input_requires_name_and_id() {
        assert!(ClientInput::new("Maria Silva", "123.456.789-00").validate().is_ok());
        assert!(ClientInput::new("  ", "123.456.789-00").validate().is_err());
        assert!(ClientInput::new("Maria Silva", "").validate().is_err());
    }

    #[test]
    fn test_client_input_optional_fields() {
        let input: ClientInput =
            serde_json::from_str(r#"{"nome_completo": "Maria", "cpf_cnpj": "1"}"#).unwrap();
        assert_eq!(input.email, None);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!("aprovado".parse::<CostingStatus>().unwrap(), CostingStatus::Aprovado);
        assert_eq!(InvestmentStatus::default().as_str(), "ativo");
        assert!("perdido".parse::<InvestmentStatus>().is_err());
        assert_eq!(DocumentKind::default(), DocumentKind::Outro);
    }
}
