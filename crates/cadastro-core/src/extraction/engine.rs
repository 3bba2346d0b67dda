//! Applies a field catalog to document text.

use std::path::Path;

use tracing::{debug, trace};

use super::catalog::FieldCatalog;
use super::{DocumentReport, FieldMatch};

/// Field extraction engine.
///
/// Stateless: the same text and catalog always produce the same report.
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractionEngine {
    max_examples: usize,
}

impl FieldExtractionEngine {
    /// Default number of examples kept per field.
    pub const DEFAULT_MAX_EXAMPLES: usize = 3;

    /// Create a new engine with default settings.
    pub fn new() -> Self {
        Self {
            max_examples: Self::DEFAULT_MAX_EXAMPLES,
        }
    }

    /// Set how many examples are kept per field.
    pub fn with_max_examples(mut self, max_examples: usize) -> Self {
        self.max_examples = max_examples;
        self
    }

    pub fn max_examples(&self) -> usize {
        self.max_examples
    }

    /// Run every pattern of `catalog` over `text`.
    ///
    /// Fields without matches are left out of the report. Examples are the
    /// first matches by position in the text.
    pub fn extract(&self, text: &str, catalog: &FieldCatalog) -> DocumentReport {
        let mut report = DocumentReport::empty(catalog.category());

        for field in catalog.fields() {
            let mut matches = field.captures(text).peekable();
            if matches.peek().is_none() {
                trace!("{}: no match for {}", catalog.category(), field.name());
                continue;
            }

            let exemplos: Vec<String> = matches
                .take(self.max_examples)
                .map(str::to_string)
                .collect();

            trace!("{}: {} -> {:?}", catalog.category(), field.name(), exemplos);
            report.campos_identificados.push(FieldMatch {
                campo: field.name().to_string(),
                padrao: field.pattern().to_string(),
                exemplos,
            });
        }

        debug!(
            "Identified {}/{} {} fields in {} chars",
            report.len(),
            catalog.len(),
            catalog.category(),
            text.len()
        );

        report
    }

    /// Read a document (PDF, or `.txt` with extracted text) and extract its fields.
    ///
    /// An unreadable document yields a report with no fields.
    pub fn extract_file(&self, path: &Path, catalog: &FieldCatalog) -> DocumentReport {
        let text = crate::pdf::read_text_or_empty(path);
        self.extract(&text, catalog)
    }
}

impl Default for FieldExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract fields with the default engine.
pub fn extract_fields(text: &str, catalog: &FieldCatalog) -> DocumentReport {
    FieldExtractionEngine::new().extract(text, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::catalog::{FieldPattern, CUSTEIO_FIELDS};
    use crate::extraction::DocumentCategory;
    use pretty_assertions::assert_eq;

    fn custeio() -> &'static FieldCatalog {
        FieldCatalog::builtin(DocumentCategory::Custeio)
    }

    fn investimento() -> &'static FieldCatalog {
        FieldCatalog::builtin(DocumentCategory::Investimento)
    }

    const SAMPLE: &str = "Nome: Maria Silva\nCPF: 123.456.789-00\nValor: R$ 1.500,00";

    #[test]
    fn test_sample_costing_document() {
        let report = extract_fields(SAMPLE, custeio());
        assert_eq!(report.tipo, DocumentCategory::Custeio);

        let nome = report.field("nome_cliente").expect("nome_cliente");
        assert_eq!(nome.exemplos.len(), 1);
        assert!(nome.exemplos[0].starts_with("Maria Silva"));
        assert!(!nome.exemplos[0].contains("Nome"));

        assert_eq!(report.field("cpf_cnpj").unwrap().exemplos, vec!["123.456.789-00"]);
        assert_eq!(report.field("valor").unwrap().exemplos, vec!["1.500,00"]);

        let names: Vec<&str> = report.campos_identificados.iter().map(|m| m.campo.as_str()).collect();
        assert_eq!(names, vec!["nome_cliente", "cpf_cnpj", "valor"]);
    }

    #[test]
    fn test_pattern_text_reported() {
        let report = extract_fields(SAMPLE, custeio());
        let expected = CUSTEIO_FIELDS.iter().find(|(name, _)| *name == "cpf_cnpj").unwrap().1;
        assert_eq!(report.field("cpf_cnpj").unwrap().padrao, expected);
    }

    #[test]
    fn test_empty_text_yields_empty_reports() {
        for category in DocumentCategory::ALL {
            let report = extract_fields("", FieldCatalog::builtin(category));
            assert_eq!(report.tipo, category);
            assert!(report.campos_identificados.is_empty());
        }
    }

    #[test]
    fn test_examples_capped_in_order() {
        let text = "email a@x.com, b@x.com.br; c@y.org e d@z.net";
        let report = extract_fields(text, custeio());
        assert_eq!(
            report.field("email").unwrap().exemplos,
            vec!["a@x.com", "b@x.com.br", "c@y.org"]
        );
    }

    #[test]
    fn test_custom_example_limit() {
        let text = "Taxa: 1,5% Juros: 2% Taxa 3%";
        let engine = FieldExtractionEngine::new().with_max_examples(2);
        let report = engine.extract(text, custeio());
        assert_eq!(report.field("taxa_juros").unwrap().exemplos, vec!["1,5%", "2%"]);
    }

    #[test]
    fn test_case_insensitive_labels() {
        let spellings = ["CPF: 123.456.789-00", "cpf: 123.456.789-00", "Cpf: 123.456.789-00"];
        let reports: Vec<_> = spellings.iter().map(|t| extract_fields(t, custeio())).collect();

        for report in &reports {
            assert_eq!(report.field("cpf_cnpj").unwrap().exemplos, vec!["123.456.789-00"]);
        }
        assert_eq!(reports[0], reports[1]);
        assert_eq!(reports[1], reports[2]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "Investidor: João\nCapital: R$ 250.000,00\nPrazo: 36 meses\nRetorno: 12,5%";
        let first = extract_fields(text, investimento());
        let second = extract_fields(text, investimento());
        assert_eq!(first, second);
        assert_eq!(first.field("prazo_investimento").unwrap().exemplos, vec!["36 meses"]);
        assert_eq!(first.field("rentabilidade").unwrap().exemplos, vec!["12,5%"]);
    }

    #[test]
    fn test_absent_fields_have_no_matches() {
        let text = "Solicitante: Claudinei Couto\nCNPJ 12.345.678/0001-90\nPrazo: 12 meses\n\
                    Data: 05/07/24\nGarantia: penhor de safra\nTelefone: (64) 3621-0000";
        for category in DocumentCategory::ALL {
            let catalog = FieldCatalog::builtin(category);
            let report = extract_fields(text, catalog);
            for field in catalog.fields() {
                if report.field(field.name()).is_none() {
                    assert!(!field.regex().is_match(text), "{} should not match", field.name());
                }
            }
            for found in &report.campos_identificados {
                assert!(!found.exemplos.is_empty());
                assert!(found.exemplos.len() <= FieldExtractionEngine::DEFAULT_MAX_EXAMPLES);
            }
        }
    }

    #[test]
    fn test_accented_labels() {
        let text = "Endereço: Rua das Flores, 120 - Centro\nData de Início: 01/02/2024";
        let report = extract_fields(text, investimento());
        assert!(report.field("endereco").unwrap().exemplos[0].starts_with("Rua das Flores, 120 - Centro"));
        assert_eq!(report.field("data_inicio").unwrap().exemplos, vec!["01/02/2024"]);
    }

    #[test]
    fn test_zero_limit_keeps_field_presence() {
        let engine = FieldExtractionEngine::new().with_max_examples(0);
        let report = engine.extract(SAMPLE, custeio());
        assert!(report.field("valor").unwrap().exemplos.is_empty());
    }

    #[test]
    fn test_unreadable_file_yields_empty_report() {
        let report = FieldExtractionEngine::new()
            .extract_file(Path::new("/nonexistent/investimento.pdf"), investimento());
        assert_eq!(report, DocumentReport::empty(DocumentCategory::Investimento));
    }

    #[test]
    fn test_text_file_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custeio.txt");
        std::fs::write(&path, SAMPLE).unwrap();

        let report = FieldExtractionEngine::new().extract_file(&path, custeio());
        assert_eq!(report, extract_fields(SAMPLE, custeio()));
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = FieldCatalog::new(
            DocumentCategory::Investimento,
            vec![FieldPattern::new("rebanho", r"Cabeças[:\s]*(\d+)")],
        )
        .unwrap();
        let report = extract_fields("cabeças: 420", &catalog);
        assert_eq!(report.field("rebanho").unwrap().exemplos, vec!["420"]);
    }
}
