//! Costings command - costing ("custeio") requests of a client.

use clap::{Args, Subcommand};
use console::style;
use rust_decimal::Decimal;

use cadastro_core::models::records::CostingInput;

use super::{parse_valor, print_record, print_records, Context, ListFormat};

/// Arguments for the costings command.
#[derive(Args)]
pub struct CostingsArgs {
    #[command(subcommand)]
    command: CostingsCommand,
}

#[derive(Subcommand)]
enum CostingsCommand {
    /// List the costing requests of a client
    List {
        /// Client id
        #[arg(long)]
        cliente: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ListFormat,
    },

    /// Record a costing request for a client
    Add {
        /// Client id
        #[arg(long)]
        cliente: i64,

        /// Requested amount ("1.500,00" or "1500.00")
        #[arg(long, value_parser = parse_valor)]
        valor: Option<Decimal>,

        #[arg(long)]
        finalidade: Option<String>,

        #[arg(long)]
        prazo: Option<String>,

        #[arg(long)]
        taxa_juros: Option<String>,

        #[arg(long)]
        garantia: Option<String>,

        #[arg(long)]
        observacoes: Option<String>,
    },
}

pub async fn run(args: CostingsArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.store()?;

    match args.command {
        CostingsCommand::List { cliente, format } => {
            print_records(&store.list_costings(cliente)?, format)
        }
        CostingsCommand::Add {
            cliente,
            valor,
            finalidade,
            prazo,
            taxa_juros,
            garantia,
            observacoes,
        } => {
            let input = CostingInput {
                valor,
                finalidade,
                prazo,
                taxa_juros,
                garantia,
                observacoes,
            };
            let costing = store.create_costing(cliente, &input)?;
            eprintln!(
                "{} Costing {} recorded for client {}",
                style("✓").green(),
                costing.id,
                cliente
            );
            print_record(&costing)
        }
    }
}
