//! Fixed-template client reports (costing or investment summaries).

mod text;

pub use text::TextRenderer;

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::amounts::format_amount;
use crate::extraction::DocumentCategory;
use crate::models::records::{Client, Costing, Investment};
use crate::records::{secure_filename, RecordStore};

/// Placeholder for missing values.
pub const NOT_INFORMED: &str = "Não informado";

/// A titled group of labeled values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub heading: String,
    pub lines: Vec<ReportLine>,
}

/// One `label: value` line of a report section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub label: String,
    pub value: String,
}

impl ReportLine {
    fn field(label: &str, value: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            value: value.unwrap_or(NOT_INFORMED).to_string(),
        }
    }
}

/// Renderer-independent report content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub title: String,
    pub sections: Vec<ReportSection>,
    pub generated_at: NaiveDateTime,
}

impl ReportDocument {
    /// Closing line with the generation time.
    pub fn footer(&self) -> String {
        format!(
            "Documento gerado em: {}",
            self.generated_at.format("%d/%m/%Y às %H:%M")
        )
    }
}

/// Turns a [`ReportDocument`] into file contents.
pub trait DocumentRenderer {
    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Render the document.
    fn render(&self, document: &ReportDocument) -> Vec<u8>;
}

fn client_section(client: &Client) -> ReportSection {
    ReportSection {
        heading: "INFORMAÇÕES DO CLIENTE".to_string(),
        lines: vec![
            ReportLine::field("Nome Completo", Some(client.nome_completo.as_str())),
            ReportLine::field("CPF/CNPJ", Some(client.cpf_cnpj.as_str())),
            ReportLine::field("Endereço", client.endereco.as_deref()),
            ReportLine::field("Telefone", client.telefone.as_deref()),
            ReportLine::field("Email", client.email.as_deref()),
        ],
    }
}

fn costing_section(costing: &Costing) -> ReportSection {
    let valor = match costing.valor {
        Some(v) => ReportLine::field("Valor", Some(format!("R$ {}", format_amount(v)).as_str())),
        None => ReportLine::field("Valor", None),
    };

    ReportSection {
        heading: "INFORMAÇÕES DO CUSTEIO".to_string(),
        lines: vec![
            valor,
            ReportLine::field("Finalidade", costing.finalidade.as_deref()),
            ReportLine::field("Prazo", costing.prazo.as_deref()),
            ReportLine::field("Taxa de Juros", costing.taxa_juros.as_deref()),
            ReportLine::field("Garantia", costing.garantia.as_deref()),
        ],
    }
}

fn investment_section(investment: &Investment) -> ReportSection {
    let valor = match investment.valor_investimento {
        Some(v) => ReportLine::field(
            "Valor do Investimento",
            Some(format!("R$ {}", format_amount(v)).as_str()),
        ),
        None => ReportLine::field("Valor", None),
    };

    ReportSection {
        heading: "INFORMAÇÕES DO INVESTIMENTO".to_string(),
        lines: vec![
            valor,
            ReportLine::field("Tipo de Investimento", investment.tipo_investimento.as_deref()),
            ReportLine::field("Prazo do Investimento", investment.prazo_investimento.as_deref()),
            ReportLine::field("Rentabilidade", investment.rentabilidade.as_deref()),
            ReportLine::field("Objetivo", investment.objetivo.as_deref()),
        ],
    }
}

/// Costing report for a client and (optionally) one of its costing requests.
pub fn costing_report(
    client: &Client,
    costing: Option<&Costing>,
    generated_at: NaiveDateTime,
) -> ReportDocument {
    let mut sections = vec![client_section(client)];
    sections.extend(costing.map(costing_section));

    ReportDocument {
        title: "DOCUMENTO DE CUSTEIO".to_string(),
        sections,
        generated_at,
    }
}

/// Investment report for a client and (optionally) one of its investments.
pub fn investment_report(
    client: &Client,
    investment: Option<&Investment>,
    generated_at: NaiveDateTime,
) -> ReportDocument {
    let mut sections = vec![client_section(client)];
    sections.extend(investment.map(investment_section));

    ReportDocument {
        title: "DOCUMENTO DE INVESTIMENTO".to_string(),
        sections,
        generated_at,
    }
}

/// A report written to the upload directory.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub file_name: String,
    pub path: PathBuf,
}

/// File name `{tipo}_{client name}_{YYYYmmdd_HHMMSS}.{ext}`.
pub fn report_file_name(
    category: DocumentCategory,
    client: &Client,
    generated_at: NaiveDateTime,
    extension: &str,
) -> String {
    format!(
        "{}_{}_{}.{}",
        category,
        secure_filename(&client.nome_completo),
        generated_at.format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Build the report of `category` for a client from stored records and
/// write it into the store's upload directory.
///
/// The first costing/investment of the client is used; the section is left
/// out when there is none.
pub fn generate_report(
    store: &RecordStore,
    category: DocumentCategory,
    cliente_id: i64,
    renderer: &dyn DocumentRenderer,
) -> crate::Result<GeneratedReport> {
    let client = store.get_client(cliente_id)?;
    let now = Local::now().naive_local();

    let document = match category {
        DocumentCategory::Custeio => {
            let costing = store.list_costings(cliente_id)?.into_iter().next();
            costing_report(&client, costing.as_ref(), now)
        }
        DocumentCategory::Investimento => {
            let investment = store.list_investments(cliente_id)?.into_iter().next();
            investment_report(&client, investment.as_ref(), now)
        }
    };

    let file_name = report_file_name(category, &client, now, renderer.extension());
    std::fs::create_dir_all(store.upload_dir())?;
    let path = store.upload_dir().join(&file_name);
    std::fs::write(&path, renderer.render(&document))?;

    info!("Generated {} report for client {}: {}", category, cliente_id, path.display());
    Ok(GeneratedReport { file_name, path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CadastroError, RecordError};
    use crate::models::records::{ClientInput, CostingInput, CostingStatus, InvestmentInput};
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 5).unwrap().and_hms_opt(14, 30, 9).unwrap()
    }

    fn client() -> Client {
        Client {
            id: 1,
            nome_completo: "Claudinei Couto".to_string(),
            cpf_cnpj: "123.456.789-00".to_string(),
            endereco: None,
            telefone: Some("(64) 3621-0000".to_string()),
            email: None,
            data_cadastro: Utc::now(),
            observacoes: None,
        }
    }

    #[test]
    fn test_costing_report_content() {
        let costing = Costing {
            id: 1,
            cliente_id: 1,
            valor: Some(Decimal::new(150_000, 2)),
            finalidade: Some("Custeio de soja".to_string()),
            prazo: None,
            taxa_juros: Some("7%".to_string()),
            garantia: None,
            data_solicitacao: Utc::now(),
            status: CostingStatus::Pendente,
            observacoes: None,
        };

        let report = costing_report(&client(), Some(&costing), at());
        assert_eq!(report.title, "DOCUMENTO DE CUSTEIO");
        assert_eq!(report.sections.len(), 2);
        assert_eq!(
            report.sections[0].lines[2],
            ReportLine {
                label: "Endereço".to_string(),
                value: NOT_INFORMED.to_string()
            }
        );
        assert_eq!(
            report.sections[1].lines[0],
            ReportLine {
                label: "Valor".to_string(),
                value: "R$ 1,500.00".to_string()
            }
        );
        assert_eq!(report.footer(), "Documento gerado em: 05/07/2024 às 14:30");
    }

    #[test]
    fn test_investment_section_omitted_without_record() {
        let report = investment_report(&client(), None, at());
        assert_eq!(report.title, "DOCUMENTO DE INVESTIMENTO");
        assert_eq!(report.sections.len(), 1);
    }

    #[test]
    fn test_report_file_name() {
        let name = report_file_name(DocumentCategory::Investimento, &client(), at(), "txt");
        assert_eq!(name, "investimento_Claudinei_Couto_20240705_143009.txt");
    }

    #[test]
    fn test_generate_report_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open_in_memory()
            .unwrap()
            .with_uploads(dir.path().to_path_buf(), 1024);
        let client = store
            .create_client(&ClientInput::new("Renato Caldeira", "987.654.321-00"))
            .unwrap();
        store
            .create_investment(
                client.id,
                &InvestmentInput {
                    tipo_investimento: Some("Pecuário".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        store
            .create_costing(client.id, &CostingInput::default())
            .unwrap();

        let generated =
            generate_report(&store, DocumentCategory::Investimento, client.id, &TextRenderer).unwrap();
        assert!(generated.file_name.starts_with("investimento_Renato_Caldeira_"));

        let content = std::fs::read_to_string(&generated.path).unwrap();
        assert!(content.contains("Tipo de Investimento: Pecuário"));
        assert!(content.contains("Valor: Não informado"));
    }

    #[test]
    fn test_generate_report_unknown_client() {
        let store = RecordStore::open_in_memory().unwrap();
        let err = generate_report(&store, DocumentCategory::Custeio, 7, &TextRenderer).unwrap_err();
        assert!(matches!(err, CadastroError::Record(RecordError::NotFound { id: 7, .. })));
    }
}
