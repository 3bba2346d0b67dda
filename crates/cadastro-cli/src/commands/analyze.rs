//! Analyze command - field report for a costing and an investment document.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info};

use cadastro_core::{AnalysisReport, DocumentCategory, DocumentReport};

use super::extract::format_report_text;
use super::Context;

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Costing document (PDF, or .txt with extracted text)
    #[arg(long)]
    custeio: Option<PathBuf>,

    /// Investment document (PDF, or .txt with extracted text)
    #[arg(long)]
    investimento: Option<PathBuf>,

    /// Output JSON file (default: output.analysis_file from the config)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: AnalyzeArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();

    let inputs: Vec<(DocumentCategory, PathBuf)> = [
        (DocumentCategory::Custeio, args.custeio),
        (DocumentCategory::Investimento, args.investimento),
    ]
    .into_iter()
    .filter_map(|(category, path)| path.map(|p| (category, p)))
    .collect();

    if inputs.is_empty() {
        anyhow::bail!("No documents to analyze. Pass --custeio and/or --investimento.");
    }

    let engine = ctx.config.extraction.engine();
    let catalogs = Arc::new(ctx.config.extraction.catalogs()?);

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );
    pb.set_message("Analyzing documents...");

    // Each category runs on its own blocking task
    let handles: Vec<_> = inputs
        .into_iter()
        .map(|(category, path)| {
            info!("Analyzing {} document: {}", category, path.display());
            let catalogs = Arc::clone(&catalogs);
            let handle = tokio::task::spawn_blocking(move || {
                engine.extract_file(&path, catalogs.get(category))
            });
            (category, handle)
        })
        .collect();

    let mut analysis = AnalysisReport::default();
    for (category, handle) in handles {
        match handle.await {
            Ok(report) => analysis.insert(report),
            Err(e) => {
                error!("Analysis of the {} document failed: {}", category, e);
                analysis.insert(DocumentReport::empty(category));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    let mut first = true;
    for category in DocumentCategory::ALL {
        let Some(report) = analysis.get(category) else {
            continue;
        };
        if !first {
            println!("\n{}\n", "=".repeat(50));
        }
        first = false;
        print!("{}", format_report_text(report));
    }

    let output_path = args
        .output
        .unwrap_or_else(|| ctx.config.output.analysis_file.clone());
    analysis.save(&output_path)?;

    println!(
        "\n{} Análise salva em '{}'",
        style("✓").green(),
        output_path.display()
    );

    debug!("Total analysis time: {:?}", start.elapsed());

    Ok(())
}
