//! CLI application for client records and costing/investment document analysis.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{
    analyze, clients, config, costings, documents, extract, generate, investments, stats, Context,
};

/// Cadastro - Client records and rural credit document analysis
#[derive(Parser)]
#[command(name = "cadastro")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the SQLite database (overrides the config file)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze costing and investment documents and save the field report
    Analyze(analyze::AnalyzeArgs),

    /// Extract fields from a single document
    Extract(extract::ExtractArgs),

    /// Manage clients
    Clients(clients::ClientsArgs),

    /// Manage client documents
    Documents(documents::DocumentsArgs),

    /// Manage costing requests
    Costings(costings::CostingsArgs),

    /// Manage investments
    Investments(investments::InvestmentsArgs),

    /// Generate a client report
    Generate(generate::GenerateArgs),

    /// Show record totals
    Stats(stats::StatsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
        command => {
            let ctx = Context::new(cli.config.as_deref(), cli.database)?;
            run_command(command, &ctx).await
        }
    }
}

async fn run_command(command: Commands, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Commands::Analyze(args) => analyze::run(args, ctx).await,
        Commands::Extract(args) => extract::run(args, ctx).await,
        Commands::Clients(args) => clients::run(args, ctx).await,
        Commands::Documents(args) => documents::run(args, ctx).await,
        Commands::Costings(args) => costings::run(args, ctx).await,
        Commands::Investments(args) => investments::run(args, ctx).await,
        Commands::Generate(args) => generate::run(args, ctx).await,
        Commands::Stats(args) => stats::run(args, ctx).await,
        Commands::Config(_) => unreachable!("config runs without a context"),
    }
}
