//! Generate command - write a costing or investment report for a client.

use clap::Args;
use console::style;

use cadastro_core::{generate_report, DocumentCategory, TextRenderer};

use super::Context;

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Report type (custeio or investimento)
    #[arg(short, long)]
    tipo: DocumentCategory,

    /// Client id
    #[arg(long)]
    cliente: i64,
}

pub async fn run(args: GenerateArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let generated = generate_report(&store, args.tipo, args.cliente, &TextRenderer)?;

    println!(
        "{} Documento gerado: {}",
        style("✓").green(),
        generated.path.display()
    );

    Ok(())
}
