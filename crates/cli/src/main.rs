use anyhow::Result;
use clap::{Parser, Subcommand};
use rolodex_core::{ContactType, PersonId};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::contacts::{self, FieldArgs};

#[derive(Parser)]
#[command(name = "rolodex")]
#[command(about = "Contact list kept in sync with a remote person collection", long_about = None)]
struct Cli {
    /// Server base URL (overrides ROLODEX_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print contacts, optionally filtered by name or email
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a contact
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, help = "personal, work or other")]
        contact_type: Option<ContactType>,
    },
    /// Change fields of an existing contact
    Edit {
        id: PersonId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, help = "personal, work or other")]
        contact_type: Option<ContactType>,
        #[arg(long, conflicts_with = "contact_type")]
        clear_contact_type: bool,
    },
    /// Delete a contact
    Delete { id: PersonId },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { search } => contacts::run_list(cli.api_url, search).await?,
        Commands::Add { name, email, phone, contact_type } => {
            let fields = FieldArgs {
                name: Some(name),
                email: Some(email),
                phone,
                contact_type,
                clear_contact_type: false,
            };
            contacts::run_add(cli.api_url, fields).await?;
        },
        Commands::Edit { id, name, email, phone, contact_type, clear_contact_type } => {
            let fields = FieldArgs { name, email, phone, contact_type, clear_contact_type };
            contacts::run_edit(cli.api_url, id, fields).await?;
        },
        Commands::Delete { id } => contacts::run_delete(cli.api_url, id).await?,
    }

    Ok(())
}
