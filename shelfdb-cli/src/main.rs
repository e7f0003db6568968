use clap::{Parser, Subcommand, ValueEnum};
use shelfdb::{Consistency, FacadeLogger, Format, Options, Store};
use std::io::{Read, Write};
use std::process;
use std::sync::Arc;

/// ShelfDB CLI: inspect and edit a ShelfDB data directory from the command line
#[derive(Parser)]
#[command(name = "shelfdb", version, about)]
struct Cli {
    /// Path to the data directory (default: current directory)
    #[arg(long, default_value = ".")]
    data_dir: String,

    /// Record format used on disk
    #[arg(long, default_value = "json")]
    format: StorageFormat,

    /// Make reads wait for in-flight writes to the same collection
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum StorageFormat {
    Json,
    Yaml,
}

impl From<StorageFormat> for Format {
    fn from(f: StorageFormat) -> Self {
        match f {
            StorageFormat::Json => Format::Json,
            StorageFormat::Yaml => Format::Yaml,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Write a record, replacing any existing one
    Put {
        /// Collection name
        collection: String,
        /// Resource name
        resource: String,
        /// Record as a JSON document (read from stdin when omitted)
        #[arg(long)]
        value: Option<String>,
    },

    /// Print a single record
    Get {
        /// Collection name
        collection: String,
        /// Resource name
        resource: String,
    },

    /// Print every record in a collection
    List {
        /// Collection name
        collection: String,
        /// Print the files as stored instead of a JSON array
        #[arg(long)]
        raw: bool,
    },

    /// Delete a record, or the whole collection when no resource is given
    Delete {
        /// Collection name
        collection: String,
        /// Resource name
        resource: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let consistency = if cli.strict {
        Consistency::Strict
    } else {
        Consistency::BestEffort
    };
    let options = Options::default()
        .with_logger(Arc::new(FacadeLogger))
        .with_format(cli.format.into())
        .with_consistency(consistency);

    log::debug!("Opening store at: {}", cli.data_dir);
    let store = Store::open(&cli.data_dir, options)?;

    match cli.command {
        Command::Put {
            collection,
            resource,
            value,
        } => {
            let input = match value {
                Some(v) => v,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let data: serde_json::Value = serde_json::from_str(&input)?;
            store.write(&collection, &resource, &data)?;
            print_json(&serde_json::json!({ "ok": true, "collection": collection, "resource": resource }))?;
        }

        Command::Get {
            collection,
            resource,
        } => {
            let data: serde_json::Value = store.read(&collection, &resource)?;
            print_json(&data)?;
        }

        Command::List { collection, raw } => {
            if raw {
                let mut stdout = std::io::stdout().lock();
                for blob in store.read_all(&collection)? {
                    stdout.write_all(&blob)?;
                }
                stdout.flush()?;
            } else {
                let records: Vec<serde_json::Value> = store.read_all_as(&collection)?;
                print_json(&serde_json::Value::Array(records))?;
            }
        }

        Command::Delete {
            collection,
            resource,
        } => {
            match resource.as_deref() {
                Some(resource) => store.delete(&collection, resource)?,
                None => store.drop_collection(&collection)?,
            }
            print_json(&serde_json::json!({
                "ok": true,
                "deleted": shelfdb::path::relative(&collection, resource.as_deref().unwrap_or("")),
            }))?;
        }
    }

    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
