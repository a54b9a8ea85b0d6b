//! Command-line and environment configuration for the quotation server.
//!
//! Every option can also be set through the environment variable named next to it,
//! or through a `.env` file in the working directory.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use quote_common::net::{DEFAULT_PORT, addr};

use crate::fetcher::{PAIR_KEY, UPSTREAM_URL};

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Serves the latest USD/BRL bid and stores every quote", long_about = None)]
pub struct ServerConfig {
    /// Interface to bind.
    #[clap(long, env = "QUOTE_SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// TCP port to bind.
    #[clap(long, env = "QUOTE_SERVER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// SQLite database file; its directory is created on start.
    #[clap(long, env = "QUOTE_DATABASE_PATH", default_value = "./data/quotations.db")]
    pub database: PathBuf,

    /// Upstream quote endpoint.
    #[clap(long, env = "QUOTE_UPSTREAM_URL", default_value = UPSTREAM_URL)]
    pub upstream_url: String,

    /// Key under which the upstream namespaces the quote.
    #[clap(long, env = "QUOTE_PAIR_KEY", default_value = PAIR_KEY)]
    pub pair_key: String,

    /// Overall budget of one `/cotacao` request, in milliseconds.
    #[clap(long, env = "QUOTE_REQUEST_BUDGET_MS", default_value_t = 200)]
    pub request_budget_ms: u64,

    /// Upstream fetch timeout, in milliseconds.
    #[clap(long, env = "QUOTE_FETCH_TIMEOUT_MS", default_value_t = 200)]
    pub fetch_timeout_ms: u64,

    /// Store transaction timeout, in milliseconds.
    #[clap(long, env = "QUOTE_STORE_TIMEOUT_MS", default_value_t = 10)]
    pub store_timeout_ms: u64,

    /// Budget of one `/health` request, in milliseconds.
    #[clap(long, env = "QUOTE_HEALTH_BUDGET_MS", default_value_t = 10)]
    pub health_budget_ms: u64,

    /// Upper bound of pooled store connections.
    #[clap(long, env = "QUOTE_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        addr(&self.host, self.port)
    }

    pub fn request_budget(&self) -> Duration {
        Duration::from_millis(self.request_budget_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn health_budget(&self) -> Duration {
        Duration::from_millis(self.health_budget_ms)
    }
}
