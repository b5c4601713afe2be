//! # Profile Index CLI (`pfx`)
//!
//! The `pfx` binary is the primary interface for Profile Index. It provides
//! commands for ingesting profile JSON files, inspecting stored records, and
//! starting the ingestion HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! pfx --config ./config/pfx.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pfx ingest <path>` | Upsert one `.json` file or every `.json` under a directory |
//! | `pfx get <id>` | Fetch a stored record by profile id |
//! | `pfx serve` | Start the ingestion HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Upsert a single profile
//! pfx ingest ./profiles/prof-42.json --config ./config/pfx.toml
//!
//! # Upsert a directory of profiles (unchanged ones are skipped)
//! pfx ingest ./profiles/ --config ./config/pfx.toml
//!
//! # Inspect what got stored
//! pfx get prof-42 --config ./config/pfx.toml
//!
//! # Serve the HTTP ingestion API
//! pfx serve --config ./config/pfx.toml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use profile_index::store::chroma::ChromaStore;
use profile_index::store::ProfileStore;
use profile_index::{config, ingest, server};

/// Profile Index CLI — a semantic index for pooled data-quality profiles.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/pfx.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "pfx",
    about = "Profile Index — a semantic index for pooled data-quality profiles",
    version,
    long_about = "Profile Index ingests nested data-quality profile JSON documents, extracts \
    their high-signal fields, renders a fixed-template summary, and upserts the result into a \
    Chroma vector collection so profiles can be semantically searched later."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/pfx.toml`. Store, embedding, and server settings
    /// are read from this file.
    #[arg(long, global = true, default_value = "./config/pfx.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Ingest profile JSON files.
    ///
    /// Accepts a single `.json` file or a directory (walked recursively).
    /// Each profile is hashed, extracted, summarized, embedded, and upserted;
    /// profiles whose content is unchanged since the last run are skipped.
    Ingest {
        /// Path to a `.json` profile file or a directory of them.
        path: PathBuf,
    },

    /// Fetch a stored record by profile id.
    ///
    /// Prints the record's metadata as stored in the collection.
    Get {
        /// Profile id (the document id in the collection).
        id: String,
    },

    /// Start the ingestion HTTP server.
    ///
    /// Binds to the address configured in `[server].bind` and exposes
    /// `POST /profiles`, `GET /profiles/{id}`, and `GET /health`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ingest { path } => {
            ingest::run_ingest(&cfg, &path).await?;
        }
        Commands::Get { id } => {
            run_get(&cfg, &id).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

/// CLI entry point for `pfx get` — fetches a record and prints it.
async fn run_get(config: &config::Config, id: &str) -> anyhow::Result<()> {
    let store = ChromaStore::connect(&config.store).await?;

    match store.get(id).await? {
        Some(record) => {
            println!("--- Profile ---");
            println!("id:       {}", record.id);
            println!(
                "content_sha256: {}",
                record.content_sha256.as_deref().unwrap_or("(none)")
            );
            println!("metadata: {}", serde_json::to_string_pretty(&record.metadata)?);
        }
        None => {
            eprintln!("Error: no profile indexed with id: {}", id);
            std::process::exit(1);
        }
    }

    Ok(())
}
