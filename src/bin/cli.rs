//! FlatKV CLI
//!
//! Command-line interface for inspecting and editing a FlatKV store file.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flatkv::format::{escape, unescape};
use flatkv::{Config, Entry, KeyValueStorage, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// FlatKV CLI
#[derive(Parser, Debug)]
#[command(name = "flatkv-cli")]
#[command(about = "CLI for FlatKV file-backed key-value stores")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./flatkv_data")]
    data_dir: String,

    /// Logical store name (file is {data_dir}/{store}.kv)
    #[arg(short, long, default_value = Config::DEFAULT_STORE_NAME)]
    store: String,

    /// Keys and values on the command line use `\\` and `\n` escapes
    #[arg(short, long)]
    escaped: bool,

    /// Skip fsync when saving
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get values by key (printed escaped, one `key<TAB>value` per line)
    Get {
        /// The keys to get
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Deep-merge a JSON object into the stored value
    Merge {
        /// The key to merge into
        key: String,

        /// JSON object to merge
        json: String,
    },

    /// Remove keys
    Remove {
        /// The keys to remove
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// List all keys in store order
    Keys,

    /// Remove every entry
    Clear,

    /// Print the whole store as JSON
    Dump,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,flatkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> flatkv::Result<()> {
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .store_name(&args.store)
        .sync_strategy(if args.no_sync {
            SyncStrategy::OsBuffered
        } else {
            SyncStrategy::EveryWrite
        })
        .build();

    tracing::debug!("FlatKV CLI v{}", flatkv::VERSION);
    tracing::debug!("Store file: {}", config.file_path().display());

    let mut storage = KeyValueStorage::open(config)?;
    let decode = |text: String| -> flatkv::Result<String> {
        if args.escaped {
            Ok(unescape(&text)?)
        } else {
            Ok(text)
        }
    };

    match args.command {
        Commands::Get { keys } => {
            let keys = keys.into_iter().map(decode).collect::<flatkv::Result<Vec<_>>>()?;
            for (key, value) in storage.multi_get(&keys) {
                println!("{}\t{}", escape(&key), escape(&value));
            }
        }
        Commands::Set { key, value } => {
            storage.multi_set([(decode(key)?, decode(value)?)])?;
        }
        Commands::Merge { key, json } => {
            storage.multi_merge([(decode(key)?, json)])?;
        }
        Commands::Remove { keys } => {
            let keys = keys.into_iter().map(decode).collect::<flatkv::Result<Vec<_>>>()?;
            storage.multi_remove(&keys)?;
        }
        Commands::Keys => {
            for key in storage.get_all_keys() {
                println!("{}", escape(&key));
            }
        }
        Commands::Clear => {
            storage.clear()?;
        }
        Commands::Dump => {
            let entries: Vec<&Entry> = storage.entries().collect();
            let json = serde_json::to_string_pretty(&entries)?;
            println!("{}", json);
        }
    }

    Ok(())
}
