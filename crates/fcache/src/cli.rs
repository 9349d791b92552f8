//! Maintenance command line
//!
//! Operational commands against the configured cache. Not meant for the
//! request path.

use clap::{Parser, Subcommand};
use fcache_domain::error::{Error, Result};
use fcache_domain::ports::infrastructure::CacheStoreInterface;
use std::path::PathBuf;

/// Command line interface for fcache
#[derive(Parser, Debug)]
#[command(name = "fcache")]
#[command(about = "fcache - cache maintenance")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Maintenance commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Probe the remote cache
    Ping,
    /// Print cache statistics as JSON
    Stats,
    /// Drop every entry owned by this cache
    Clear,
    /// Drop every entry whose key starts with a prefix
    Invalidate {
        /// Key prefix, e.g. `U1_dash_`
        #[arg(long)]
        prefix: String,
    },
    /// Print one cached value
    Get {
        /// Cache key
        key: String,
    },
}

/// Run a command against a store, returning the text to print
pub async fn execute(store: &dyn CacheStoreInterface, command: &Command) -> Result<String> {
    match command {
        Command::Ping => {
            if store.ping().await {
                Ok(format!("PONG ({})", store.mode()))
            } else {
                Err(Error::cache("remote cache did not answer"))
            }
        }
        Command::Stats => Ok(serde_json::to_string_pretty(&store.stats().await)?),
        Command::Clear => {
            if store.clear().await {
                Ok("cleared".to_string())
            } else {
                Err(Error::cache(
                    "cleared locally; remote clear pending until it recovers",
                ))
            }
        }
        Command::Invalidate { prefix } => {
            if prefix.is_empty() {
                return Err(Error::invalid_argument(
                    "prefix cannot be empty; use `clear` to drop everything",
                ));
            }
            if store.delete_by_prefix(prefix).await {
                Ok(format!("invalidated {prefix}*"))
            } else {
                Err(Error::cache(format!(
                    "invalidated {prefix}* locally; remote invalidation pending"
                )))
            }
        }
        Command::Get { key } => match store.get_value(key).await {
            Some(value) => Ok(serde_json::to_string_pretty(&value)?),
            None => Err(Error::cache(format!("no entry for {key}"))),
        },
    }
}
