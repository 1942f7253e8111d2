//! Exhibit CLI - exhibit command

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli_lib::settings::{self, Overrides};
use cli_lib::{Exhibits, NewExhibit};
use exhibit_store::Store;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;

/// Exhibit - save messages and show them again later
#[derive(Parser)]
#[command(name = "exhibit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML file with `path` and `flush_delay_ms`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data file (overrides DATAFILE_LOCATION)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Quiescence delay before a deferred flush, in milliseconds
    #[arg(long, global = true)]
    flush_delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the raw value stored under a key
    Get {
        key: String,
        /// Printed when the key is absent instead of failing
        #[arg(long)]
        default: Option<String>,
    },
    /// Store a raw value (JSON, or a plain string)
    Set {
        key: String,
        value: String,
    },
    /// List stored keys
    Keys {
        /// Only keys starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Save a message as a new exhibit
    Save {
        /// User saving the exhibit
        #[arg(long)]
        owner: u64,
        #[arg(long)]
        author_id: u64,
        #[arg(long)]
        author_name: String,
        #[arg(long, default_value = "")]
        author_profile_url: String,
        /// Omit for direct messages
        #[arg(long)]
        guild_id: Option<u64>,
        #[arg(long)]
        channel_id: u64,
        #[arg(long)]
        message_id: u64,
        #[arg(long)]
        attachment_url: Option<String>,
        /// Message text
        content: String,
    },
    /// Display an exhibit
    Show {
        #[arg(long)]
        owner: u64,
        number: u64,
    },
    /// List all exhibits of a user
    List {
        #[arg(long)]
        owner: u64,
    },
    /// Suggest exhibits matching partial input
    Search {
        #[arg(long)]
        owner: u64,
        #[arg(default_value = "")]
        current: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let overrides = Overrides {
        config_file: cli.config,
        data_file: cli.data_file,
        flush_delay_ms: cli.flush_delay_ms,
    };
    let config = settings::resolve(&overrides, |key| std::env::var(key).ok())?;

    let store = Store::open(&config)
        .with_context(|| format!("Failed to open store at {}", config.path.display()))?;

    let outcome = run(cli.command, &store);

    // Nothing may be left inside the quiescence window on exit
    let flusher = store.clone();
    tokio::task::spawn_blocking(move || flusher.flush())
        .await
        .context("Shutdown flush task failed")?
        .context("Failed to flush store on shutdown")?;

    outcome
}

fn run(command: Commands, store: &Store) -> Result<()> {
    let exhibits = Exhibits::new(store.clone());

    match command {
        Commands::Get { key, default } => cmd::kv::get(store, &key, default.as_deref()),
        Commands::Set { key, value } => cmd::kv::set(store, &key, &value),
        Commands::Keys { prefix } => cmd::kv::keys(store, prefix.as_deref()),
        Commands::Save {
            owner,
            author_id,
            author_name,
            author_profile_url,
            guild_id,
            channel_id,
            message_id,
            attachment_url,
            content,
        } => cmd::exhibit::save(
            &exhibits,
            NewExhibit {
                owner_id: owner,
                author_id,
                author_name,
                author_profile_url,
                guild_id,
                channel_id,
                message_id,
                content,
                attachment_url,
            },
        ),
        Commands::Show { owner, number } => cmd::exhibit::show(&exhibits, owner, number),
        Commands::List { owner } => cmd::exhibit::list(&exhibits, owner),
        Commands::Search { owner, current } => cmd::exhibit::search(&exhibits, owner, &current),
    }
}
