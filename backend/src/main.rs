mod auth;
mod config;
mod error;
mod routes;
mod services;
mod store;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::auth::JwtKeys;
use crate::config::Config;
use crate::routes::AppState;
use crate::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();

    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let defaults = Arc::new(config.defaults()?);
    let store = Store::connect(&config.database_url, defaults).await?;
    let state = AppState {
        store,
        keys: JwtKeys::new(&config.jwt_secret, config.token_ttl_hours)?,
        currency: Arc::from(config.currency.as_str()),
    };

    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
