//! Command line and environment configuration.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::TransactionStore;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the payment API over HTTP
    Serve(ServeConfig),
    /// Replay payment requests from a csv file through the worker pool
    Replay(ReplayConfig),
}

#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Number of independently locked store partitions
    #[arg(long, env = "IDEM_PAY_SHARDS", default_value_t = TransactionStore::DEFAULT_SHARDS)]
    pub shards: usize,
}

impl StoreConfig {
    pub fn build(&self) -> TransactionStore {
        TransactionStore::with_shards(self.shards)
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServeConfig {
    /// Address to listen on
    #[arg(long, env = "IDEM_PAY_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// Per-request timeout, in seconds
    #[arg(long, env = "IDEM_PAY_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Time allowed for in-flight requests to drain on shutdown, in seconds
    #[arg(long, env = "IDEM_PAY_SHUTDOWN_TIMEOUT_SECS", default_value_t = 30)]
    pub shutdown_timeout_secs: u64,

    #[command(flatten)]
    pub store: StoreConfig,
}

impl ServeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

#[derive(Debug, Clone, Args)]
pub struct ReplayConfig {
    /// Input csv file with a `user_id,amount,transaction_id` header
    pub input: PathBuf,

    /// Number of concurrent workers submitting to the store
    #[arg(long, env = "IDEM_PAY_WORKERS", default_value_t = 5)]
    pub workers: usize,

    #[command(flatten)]
    pub store: StoreConfig,
}
