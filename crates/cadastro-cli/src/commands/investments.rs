//! Investments command - investment records of a client.

use clap::{Args, Subcommand};
use console::style;
use rust_decimal::Decimal;

use cadastro_core::models::records::InvestmentInput;

use super::{parse_valor, print_record, print_records, Context, ListFormat};

/// Arguments for the investments command.
#[derive(Args)]
pub struct InvestmentsArgs {
    #[command(subcommand)]
    command: InvestmentsCommand,
}

#[derive(Subcommand)]
enum InvestmentsCommand {
    /// List the investments of a client
    List {
        /// Client id
        #[arg(long)]
        cliente: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ListFormat,
    },

    /// Record an investment for a client
    Add {
        /// Client id
        #[arg(long)]
        cliente: i64,

        /// Invested amount ("250.000,00" or "250000")
        #[arg(long = "valor", value_parser = parse_valor)]
        valor_investimento: Option<Decimal>,

        /// Investment type
        #[arg(long = "tipo")]
        tipo_investimento: Option<String>,

        /// Investment term
        #[arg(long = "prazo")]
        prazo_investimento: Option<String>,

        #[arg(long)]
        rentabilidade: Option<String>,

        #[arg(long)]
        objetivo: Option<String>,

        #[arg(long)]
        observacoes: Option<String>,
    },
}

pub async fn run(args: InvestmentsArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.store()?;

    match args.command {
        InvestmentsCommand::List { cliente, format } => {
            print_records(&store.list_investments(cliente)?, format)
        }
        InvestmentsCommand::Add {
            cliente,
            valor_investimento,
            tipo_investimento,
            prazo_investimento,
            rentabilidade,
            objetivo,
            observacoes,
        } => {
            let input = InvestmentInput {
                valor_investimento,
                tipo_investimento,
                prazo_investimento,
                rentabilidade,
                objetivo,
                observacoes,
            };
            let investment = store.create_investment(cliente, &input)?;
            eprintln!(
                "{} Investment {} recorded for client {}",
                style("✓").green(),
                investment.id,
                cliente
            );
            print_record(&investment)
        }
    }
}
