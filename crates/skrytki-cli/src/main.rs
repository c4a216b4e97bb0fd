use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use skrytki_etl::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "skrytki", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/skrytki/skrytki.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Rebuild the search tables from a registry extract
    ///
    /// Reads the comma-separated extract (columns NAZWA, REGON, ADRES,
    /// KOD_POCZTOWY, MIEJSCOWOSC, URI) and runs it through the two-stage
    /// pipeline:
    ///
    /// - prepare: clean names and addresses, merge duplicate entities,
    ///   mark government offices, pick each entity's main mailbox and write
    ///   the staging files
    /// - load: replace both tables in a single transaction
    ///
    /// A failed run leaves the previous tables untouched.
    Load {
        /// Path to the extract (default: csv_path from the config)
        csv: Option<PathBuf>,
    },
    /// Search entities by REGON, name or address
    Search {
        /// Text to search for
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Only government offices
        #[arg(long)]
        offices: bool,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List every mailbox address of one entity
    Uris {
        /// Entity id as shown by `skrytki search`
        id: String,

        /// Print JSON instead of plain lines
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP server
    Serve {
        /// Listen address (default: bind_address from the config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Show database and last load status
    Status,
    /// Inspect or edit the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file if it does not exist
    Init,
    /// Print one setting, or the whole file
    Get { key: Option<String> },
    /// Set one setting in the config file
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Config { action } = cli.command {
        return match action {
            ConfigAction::Show => commands::config::show_config(),
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Init => commands::config::init_config(),
            ConfigAction::Get { key } => commands::config::get_config(key),
            ConfigAction::Set { key, value } => commands::config::set_config(&key, &value),
        };
    }

    let config = match cli.db {
        Some(db) => Config::load_with_db_path(db)?,
        None => Config::load()?,
    };

    // Ensure database directory exists
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
    }

    match cli.command {
        Commands::Load { csv } => {
            let csv = csv.or_else(|| config.csv_path.clone()).context(
                "No extract given: pass a CSV path or set csv_path (SKRYTKI_CSV_PATH)",
            )?;
            commands::run_load(&config, csv).await?;
        }
        Commands::Search {
            text,
            offices,
            limit,
            json,
        } => {
            let limit = limit.unwrap_or(config.default_limit);
            commands::run_search(&config, &text.join(" "), offices, limit, json).await?;
        }
        Commands::Uris { id, json } => {
            commands::run_uris(&config, &id, json).await?;
        }
        Commands::Serve { bind } => {
            commands::run_serve(&config, bind).await?;
        }
        Commands::Status => {
            commands::show_status(&config)?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}
