//! Server configuration from command-line flags and environment.

use anyhow::Result;
use budget_analyzer::stat::{Defaults, DEFAULT_CURRENCY};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// One year.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, Parser)]
#[command(name = "budget-backend", about = "Budget analyzer HTTP server")]
pub struct Config {
    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://budget.db?mode=rwc")]
    pub database_url: String,

    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// HMAC secret used to sign login tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Lifetime of a login token, in hours
    #[arg(
        long,
        env = "TOKEN_TTL_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_HOURS)
    )]
    pub token_ttl_hours: i64,

    /// JSON file replacing the built-in default budget
    #[arg(long, env = "BUDGET_DEFAULTS")]
    pub defaults_path: Option<PathBuf>,

    /// Currency label shown on the dashboard
    #[arg(long, env = "BUDGET_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,
}

impl Config {
    /// Parse flags after loading `.env` (skipped when `ENV=prod`).
    pub fn load() -> Self {
        if std::env::var("ENV").ok().as_deref() != Some("prod") {
            dotenvy::dotenv().ok();
        }
        Self::parse()
    }

    pub fn defaults(&self) -> Result<Defaults> {
        match &self.defaults_path {
            Some(path) => Defaults::from_json_file(path),
            None => Ok(Defaults::builtin()),
        }
    }
}
