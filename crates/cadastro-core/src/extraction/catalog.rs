//! Field pattern catalogs for costing and investment documents.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::DocumentCategory;
use crate::error::{CadastroError, CatalogError};

/// Costing ("custeio") document fields, in report order.
pub const CUSTEIO_FIELDS: &[(&str, &str)] = &[
    ("nome_cliente", r"(?:Nome|Cliente|Solicitante)[:\s]*([A-Za-zÀ-ÿ\s]+)"),
    ("cpf_cnpj", r"(?:CPF|CNPJ)[:\s]*(\d{3}[.\-]?\d{3}[.\-]?\d{3}[.\-]?\d{2}|\d{2}[.\-]?\d{3}[.\-]?\d{3}[.\-]?\d{4}[.\-]?\d{2})"),
    ("valor", r"(?:Valor|Montante|Total)[:\s]*R?\$?\s*([\d.,]+)"),
    ("data", r"(?:Data|Data de)[:\s]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})"),
    ("endereco", r"(?:Endereço|Endereco)[:\s]*([A-Za-zÀ-ÿ\s,\d\-]+)"),
    ("telefone", r"(?:Telefone|Tel|Fone)[:\s]*([\d\s\-\(\)]+)"),
    ("email", r"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})"),
    ("finalidade", r"(?:Finalidade|Objetivo|Propósito)[:\s]*([A-Za-zÀ-ÿ\s]+)"),
    ("prazo", r"(?:Prazo|Vencimento)[:\s]*(\d+\s*(?:dias|meses|anos))"),
    ("taxa_juros", r"(?:Taxa|Juros)[:\s]*([\d.,]+%?)"),
    ("garantia", r"(?:Garantia|Colateral)[:\s]*([A-Za-zÀ-ÿ\s]+)"),
];

/// Investment document fields, in report order.
pub const INVESTIMENTO_FIELDS: &[(&str, &str)] = &[
    ("nome_cliente", r"(?:Nome|Cliente|Investidor)[:\s]*([A-Za-zÀ-ÿ\s]+)"),
    ("cpf_cnpj", r"(?:CPF|CNPJ)[:\s]*(\d{3}[.\-]?\d{3}[.\-]?\d{3}[.\-]?\d{2}|\d{2}[.\-]?\d{3}[.\-]?\d{3}[.\-]?\d{4}[.\-]?\d{2})"),
    ("valor_investimento", r"(?:Valor|Investimento|Capital)[:\s]*R?\$?\s*([\d.,]+)"),
    ("tipo_investimento", r"(?:Tipo|Categoria|Modalidade)[:\s]*([A-Za-zÀ-ÿ\s]+)"),
    ("data_inicio", r"(?:Data de Início|Início)[:\s]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})"),
    ("prazo_investimento", r"(?:Prazo|Duração|Período)[:\s]*(\d+\s*(?:dias|meses|anos))"),
    ("rentabilidade", r"(?:Rentabilidade|Retorno|Taxa)[:\s]*([\d.,]+%?)"),
    ("endereco", r"(?:Endereço|Endereco)[:\s]*([A-Za-zÀ-ÿ\s,\d\-]+)"),
    ("telefone", r"(?:Telefone|Tel|Fone)[:\s]*([\d\s\-\(\)]+)"),
    ("email", r"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})"),
    ("objetivo", r"(?:Objetivo|Finalidade|Propósito)[:\s]*([A-Za-zÀ-ÿ\s]+)"),
];

lazy_static! {
    static ref BUILTIN_CUSTEIO: FieldCatalog =
        FieldCatalog::from_table(DocumentCategory::Custeio, CUSTEIO_FIELDS)
            .expect("built-in costing catalog must compile");

    static ref BUILTIN_INVESTIMENTO: FieldCatalog =
        FieldCatalog::from_table(DocumentCategory::Investimento, INVESTIMENTO_FIELDS)
            .expect("built-in investment catalog must compile");
}

/// Uncompiled field definition, as stored in catalog files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPattern {
    /// Field name.
    pub campo: String,
    /// Regular expression; capture group 1 (if any) is the value.
    pub padrao: String,
}

impl FieldPattern {
    pub fn new(campo: impl Into<String>, padrao: impl Into<String>) -> Self {
        Self {
            campo: campo.into(),
            padrao: padrao.into(),
        }
    }
}

/// A field with its case-insensitive compiled pattern.
#[derive(Debug, Clone)]
pub struct CompiledField {
    name: String,
    pattern: String,
    regex: Regex,
}

impl CompiledField {
    /// Compile a field definition.
    ///
    /// Fails if the pattern is invalid or has more than one capture group.
    pub fn compile(field: &FieldPattern) -> Result<Self, CatalogError> {
        let regex = RegexBuilder::new(&field.padrao)
            .case_insensitive(true)
            .build()
            .map_err(|source| CatalogError::InvalidPattern {
                field: field.campo.clone(),
                source,
            })?;

        // captures_len counts the implicit whole-match group
        let groups = regex.captures_len() - 1;
        if groups > 1 {
            return Err(CatalogError::TooManyGroups {
                field: field.campo.clone(),
                groups,
            });
        }

        Ok(Self {
            name: field.campo.clone(),
            pattern: field.padrao.clone(),
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pattern source text, without the case-insensitivity flag.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Captured values of every non-overlapping match, in order of appearance.
    ///
    /// The value is capture group 1, or the whole match when the pattern
    /// has no group.
    pub fn captures<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        let has_group = self.regex.captures_len() > 1;
        self.regex.captures_iter(text).map(move |caps| {
            let value = if has_group { caps.get(1) } else { caps.get(0) };
            value.map_or("", |m| m.as_str())
        })
    }
}

/// Ordered field catalog for one document category.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    category: DocumentCategory,
    fields: Vec<CompiledField>,
}

impl FieldCatalog {
    /// Build a catalog from field definitions, keeping their order.
    pub fn new<I>(category: DocumentCategory, fields: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = FieldPattern>,
    {
        let mut seen = HashSet::new();
        let mut compiled = Vec::new();

        for field in fields {
            if !seen.insert(field.campo.clone()) {
                return Err(CatalogError::DuplicateField(field.campo));
            }
            compiled.push(CompiledField::compile(&field)?);
        }

        debug!("Built {} catalog with {} fields", category, compiled.len());
        Ok(Self {
            category,
            fields: compiled,
        })
    }

    fn from_table(category: DocumentCategory, table: &[(&str, &str)]) -> Result<Self, CatalogError> {
        Self::new(
            category,
            table.iter().map(|(campo, padrao)| FieldPattern::new(*campo, *padrao)),
        )
    }

    /// The built-in catalog for a category.
    pub fn builtin(category: DocumentCategory) -> &'static FieldCatalog {
        match category {
            DocumentCategory::Custeio => &BUILTIN_CUSTEIO,
            DocumentCategory::Investimento => &BUILTIN_INVESTIMENTO,
        }
    }

    pub fn category(&self) -> DocumentCategory {
        self.category
    }

    /// Fields in catalog order.
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One catalog per document category.
#[derive(Debug, Clone)]
pub struct CatalogSet {
    custeio: FieldCatalog,
    investimento: FieldCatalog,
}

impl CatalogSet {
    /// The built-in catalogs.
    pub fn builtin() -> Self {
        Self {
            custeio: FieldCatalog::builtin(DocumentCategory::Custeio).clone(),
            investimento: FieldCatalog::builtin(DocumentCategory::Investimento).clone(),
        }
    }

    /// Load catalogs from a JSON file of the form
    /// `{"custeio": [{"campo": "...", "padrao": "..."}], "investimento": [...]}`.
    ///
    /// A category missing from the file keeps its built-in catalog.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let tables: HashMap<String, Vec<FieldPattern>> = serde_json::from_str(&content)
            .map_err(|e| CadastroError::Config(format!("{}: {}", path.display(), e)))?;

        let mut set = Self::builtin();
        for (name, fields) in tables {
            let category: DocumentCategory = name.parse()?;
            set.replace(FieldCatalog::new(category, fields)?);
        }

        Ok(set)
    }

    /// Replace the catalog of the given catalog's category.
    pub fn replace(&mut self, catalog: FieldCatalog) {
        match catalog.category() {
            DocumentCategory::Custeio => self.custeio = catalog,
            DocumentCategory::Investimento => self.investimento = catalog,
        }
    }

    pub fn get(&self, category: DocumentCategory) -> &FieldCatalog {
        match category {
            DocumentCategory::Custeio => &self.custeio,
            DocumentCategory::Investimento => &self.investimento,
        }
    }
}

impl Default for CatalogSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogs_compile_in_order() {
        let custeio = FieldCatalog::builtin(DocumentCategory::Custeio);
        let names: Vec<&str> = custeio.fields().iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec![
                "nome_cliente", "cpf_cnpj", "valor", "data", "endereco", "telefone",
                "email", "finalidade", "prazo", "taxa_juros", "garantia",
            ]
        );

        let investimento = FieldCatalog::builtin(DocumentCategory::Investimento);
        assert_eq!(investimento.len(), INVESTIMENTO_FIELDS.len());
        assert_eq!(investimento.fields()[2].name(), "valor_investimento");
    }

    #[test]
    fn test_catalogs_differ_by_vocabulary() {
        let custeio = FieldCatalog::builtin(DocumentCategory::Custeio);
        let investimento = FieldCatalog::builtin(DocumentCategory::Investimento);

        let text = "Investidor: Renato Caldeira";
        assert_eq!(custeio.field("nome_cliente").unwrap().captures(text).count(), 0);
        assert_eq!(
            investimento.field("nome_cliente").unwrap().captures(text).collect::<Vec<_>>(),
            vec!["Renato Caldeira"]
        );
    }

    #[test]
    fn test_pattern_kept_verbatim() {
        let field = FieldCatalog::builtin(DocumentCategory::Custeio).field("valor").unwrap();
        assert_eq!(field.pattern(), r"(?:Valor|Montante|Total)[:\s]*R?\$?\s*([\d.,]+)");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = FieldCatalog::new(
            DocumentCategory::Custeio,
            vec![FieldPattern::new("quebrado", r"(unclosed")],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPattern { ref field, .. } if field == "quebrado"));
    }

    #[test]
    fn test_multiple_groups_rejected() {
        let err = FieldCatalog::new(
            DocumentCategory::Custeio,
            vec![FieldPattern::new("dupla", r"(\d+)-(\d+)")],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::TooManyGroups { groups: 2, .. }));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = FieldCatalog::new(
            DocumentCategory::Investimento,
            vec![FieldPattern::new("email", "(a)"), FieldPattern::new("email", "(b)")],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateField(ref f) if f == "email"));
    }

    #[test]
    fn test_groupless_pattern_returns_whole_match() {
        let field = CompiledField::compile(&FieldPattern::new("cep", r"\d{5}-\d{3}")).unwrap();
        let values: Vec<&str> = field.captures("CEP 75800-000 e 74000-100").collect();
        assert_eq!(values, vec!["75800-000", "74000-100"]);
    }

    #[test]
    fn test_catalog_file_overrides_one_category() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogs.json");
        std::fs::write(
            &path,
            r#"{"investimento": [{"campo": "rebanho", "padrao": "Cabeças[:\\s]*(\\d+)"}]}"#,
        )
        .unwrap();

        let set = CatalogSet::from_file(&path).unwrap();
        assert_eq!(set.get(DocumentCategory::Investimento).len(), 1);
        assert_eq!(set.get(DocumentCategory::Custeio).len(), CUSTEIO_FIELDS.len());
    }

    #[test]
    fn test_catalog_file_unknown_category() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogs.json");
        std::fs::write(&path, r#"{"outro": []}"#).unwrap();

        let err = CatalogSet::from_file(&path).unwrap_err();
        assert!(matches!(err, CadastroError::Catalog(CatalogError::UnknownCategory(_))));
    }
}
