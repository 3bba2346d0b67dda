//! Stats command - record totals.

use clap::Args;

use super::Context;

/// Arguments for the stats command.
#[derive(Args)]
pub struct StatsArgs {
    /// Print JSON instead of a summary
    #[arg(long)]
    json: bool,
}

pub async fn run(args: StatsArgs, ctx: &Context) -> anyhow::Result<()> {
    let stats = ctx.store()?.statistics()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Clientes:      {}", stats.total_clientes);
        println!("Custeios:      {}", stats.total_custeios);
        println!("Investimentos: {}", stats.total_investimentos);
        println!("Documentos:    {}", stats.total_documentos);
    }

    Ok(())
}
