//! Extract command - field report for a single document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use cadastro_core::{DocumentCategory, DocumentReport};

use super::Context;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF, or .txt with extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Document category (custeio or investimento)
    #[arg(short, long)]
    tipo: DocumentCategory,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, ctx: &Context) -> anyhow::Result<()> {
    info!("Extracting {} fields from {}", args.tipo, args.input.display());

    let engine = ctx.config.extraction.engine();
    let catalogs = ctx.config.extraction.catalogs()?;
    let report = engine.extract_file(&args.input, catalogs.get(args.tipo));

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => format_report_text(&report),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    Ok(())
}

/// Console summary of a report: banner, category, field count and examples.
pub fn format_report_text(report: &DocumentReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "=== ANALISANDO DOCUMENTO DE {} ===\n",
        report.tipo.as_str().to_uppercase()
    ));
    output.push_str(&format!("Tipo: {}\n", report.tipo));
    output.push_str(&format!("Campos identificados: {}\n", report.len()));
    for campo in &report.campos_identificados {
        output.push_str(&format!("- {}: {:?}\n", campo.campo, campo.exemplos));
    }

    output
}
