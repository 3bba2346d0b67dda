//! Documents command - upload and list client documents.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use cadastro_core::models::records::DocumentKind;

use super::{print_record, print_records, Context, ListFormat};

/// Arguments for the documents command.
#[derive(Args)]
pub struct DocumentsArgs {
    #[command(subcommand)]
    command: DocumentsCommand,
}

#[derive(Subcommand)]
enum DocumentsCommand {
    /// List the documents of a client
    List {
        /// Client id
        #[arg(long)]
        cliente: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ListFormat,
    },

    /// Copy a file into the upload directory and record it for a client
    Upload {
        /// Client id
        #[arg(long)]
        cliente: i64,

        /// File to upload
        file: PathBuf,

        /// Document type (custeio, investimento or outro)
        #[arg(long, default_value = "outro")]
        tipo: DocumentKind,

        #[arg(long)]
        observacoes: Option<String>,
    },
}

pub async fn run(args: DocumentsArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.store()?;

    match args.command {
        DocumentsCommand::List { cliente, format } => {
            print_records(&store.list_documents(cliente)?, format)
        }
        DocumentsCommand::Upload {
            cliente,
            file,
            tipo,
            observacoes,
        } => {
            if !file.exists() {
                anyhow::bail!("Input file not found: {}", file.display());
            }

            let document = store.upload_document(cliente, &file, tipo, observacoes)?;
            eprintln!(
                "{} Uploaded {} to {}",
                style("✓").green(),
                document.nome_arquivo,
                document.caminho_arquivo.display()
            );
            print_record(&document)
        }
    }
}
