//! ClientStore CLI
//!
//! Non-interactive front-end: one subcommand per store operation.
//!
//! Exit codes: 0 done, 1 rejected or not found, 2 store failure.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use clientstore::record::{Address, Document, Name};
use clientstore::{ClientData, ClientStore, Code, Config, Outcome, Record};
use tracing_subscriber::{fmt, EnvFilter};

/// ClientStore CLI
#[derive(Parser, Debug)]
#[command(name = "clientstore-cli")]
#[command(about = "Manage the customer record store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = ".")]
    data_dir: String,

    /// Binary data file name
    #[arg(long, default_value = "clientes.dat")]
    binary_file: String,

    /// Text mirror file name
    #[arg(long, default_value = "clientes.csv")]
    mirror_file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every client in id order
    List,

    /// Register a new client
    Insert(FieldArgs),

    /// Replace the fields of a client
    Update {
        /// Id of the client to update
        id: i32,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Remove a client
    Delete {
        /// Id of the client to remove
        id: i32,
    },

    /// Show a client by id
    Get {
        /// The id to look up
        id: i32,
    },

    /// Show a client by exact full name (case-insensitive)
    Find {
        /// The full name to look up
        name: String,
    },
}

#[derive(clap::Args, Debug)]
struct FieldArgs {
    /// Full name
    #[arg(long)]
    name: String,

    /// Document (CPF/CNPJ, digits only)
    #[arg(long)]
    document: String,

    /// Address
    #[arg(long, default_value = "")]
    address: String,

    /// Birth year (YYYY)
    #[arg(long, default_value_t = 0)]
    birth_year: i16,

    /// Customer type (F/J)
    #[arg(long = "type", default_value = "")]
    customer_type: String,

    /// Sex (M/F/O)
    #[arg(long, default_value = "")]
    sex: String,

    /// Marital status (S/C/V/D)
    #[arg(long, default_value = "")]
    marital_status: String,

    /// Credit limit
    #[arg(long, default_value_t = 0.0)]
    credit_limit: f32,

    /// Registration status (A/I)
    #[arg(long, default_value = "")]
    status: String,
}

impl From<FieldArgs> for ClientData {
    fn from(args: FieldArgs) -> Self {
        ClientData {
            full_name: Name::new(&args.name),
            address: Address::new(&args.address),
            birth_year: args.birth_year,
            document: Document::new(&args.document),
            customer_type: Code::parse(&args.customer_type),
            sex: Code::parse(&args.sex),
            marital_status: Code::parse(&args.marital_status),
            credit_limit: args.credit_limit,
            registration_status: Code::parse(&args.status),
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout only carries records
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,clientstore=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .binary_file(&args.binary_file)
        .mirror_file(&args.mirror_file)
        .build();

    let mut store = match ClientStore::open(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            return ExitCode::from(2);
        }
    };

    match args.command {
        Commands::List => {
            println!("==== CLIENTES CADASTRADOS ({}) ====", store.len());
            for record in store.records() {
                println!("{}", record);
            }
            ExitCode::SUCCESS
        }
        Commands::Insert(fields) => report("Cliente cadastrado", store.insert(fields.into()).into()),
        Commands::Update { id, fields } => {
            report("Registro atualizado", store.update(id, fields.into()).into())
        }
        Commands::Delete { id } => report("Registro removido", store.delete(id).into()),
        Commands::Get { id } => show(store.find_by_id(id), &format!("ID {}", id)),
        Commands::Find { name } => show(store.find_by_name(&name), &format!("'{}'", name)),
    }
}

fn report(action: &str, outcome: Outcome<Record>) -> ExitCode {
    match outcome {
        Outcome::Committed(record) => {
            println!("{}: {}", action, record);
            ExitCode::SUCCESS
        }
        Outcome::Rejected(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
        Outcome::Failed(e) => {
            eprintln!("Operation aborted, store left unchanged: {}", e);
            ExitCode::from(2)
        }
    }
}

fn show(record: Option<&Record>, what: &str) -> ExitCode {
    match record {
        Some(record) => {
            println!("{}", record);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("No client matching {}", what);
            ExitCode::from(1)
        }
    }
}
