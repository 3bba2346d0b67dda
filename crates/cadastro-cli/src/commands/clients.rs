//! Clients command - register and maintain clients.

use clap::{Args, Subcommand};
use console::style;

use cadastro_core::models::records::ClientInput;

use super::{print_record, print_records, Context, ListFormat};

/// Arguments for the clients command.
#[derive(Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    command: ClientsCommand,
}

#[derive(Subcommand)]
enum ClientsCommand {
    /// List all clients
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ListFormat,
    },

    /// Register a new client
    Add(ClientFields),

    /// Show a client
    Show {
        /// Client id
        id: i64,
    },

    /// Replace the details of a client
    Update {
        /// Client id
        id: i64,

        #[command(flatten)]
        fields: ClientFields,
    },

    /// Delete a client with all its documents, costings and investments
    Delete {
        /// Client id
        id: i64,
    },
}

#[derive(Args)]
struct ClientFields {
    /// Full name
    #[arg(long)]
    nome: String,

    /// CPF or CNPJ
    #[arg(long)]
    cpf_cnpj: String,

    #[arg(long)]
    endereco: Option<String>,

    #[arg(long)]
    telefone: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    observacoes: Option<String>,
}

impl From<ClientFields> for ClientInput {
    fn from(fields: ClientFields) -> Self {
        ClientInput {
            nome_completo: fields.nome,
            cpf_cnpj: fields.cpf_cnpj,
            endereco: fields.endereco,
            telefone: fields.telefone,
            email: fields.email,
            observacoes: fields.observacoes,
        }
    }
}

pub async fn run(args: ClientsArgs, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.store()?;

    match args.command {
        ClientsCommand::List { format } => print_records(&store.list_clients()?, format),
        ClientsCommand::Add(fields) => {
            let client = store.create_client(&fields.into())?;
            eprintln!(
                "{} Client {} registered",
                style("✓").green(),
                client.id
            );
            print_record(&client)
        }
        ClientsCommand::Show { id } => print_record(&store.get_client(id)?),
        ClientsCommand::Update { id, fields } => {
            let client = store.update_client(id, &fields.into())?;
            eprintln!("{} Client {} updated", style("✓").green(), client.id);
            print_record(&client)
        }
        ClientsCommand::Delete { id } => {
            store.delete_client(id)?;
            println!("{} Client {} deleted", style("✓").green(), id);
            Ok(())
        }
    }
}
