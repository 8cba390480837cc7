use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL (or --database-url) must be set when using the postgres store")]
    MissingDatabaseUrl,
}

/// Where recipes are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Postgres via the connection pool
    Postgres,
    /// Process memory; contents are lost on shutdown
    Memory,
}

/// Server configuration. Every option can also be given through its
/// environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "recipe-server")]
#[command(about = "Recipe API server", long_about = None)]
pub struct Config {
    /// Print the OpenAPI spec as JSON and exit
    #[arg(long)]
    pub openapi: bool,

    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Storage backend
    #[arg(long, env = "RECIPE_STORE", value_enum, default_value_t = StoreKind::Postgres)]
    pub store: StoreKind,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long, env = "DATABASE_POOL_SIZE", default_value_t = 10)]
    pub pool_size: u32,
}

impl Config {
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}
