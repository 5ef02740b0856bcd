//! Main entry point of the validation service.
//! Loads the configuration and starts the web server with Axum.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use dotenv::dotenv;
use log::info;

use inputgate::{backend, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = backend::router::get_router(Arc::new(config));

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to open web server listener")?;

    axum::serve(listener, app)
        .await
        .context("Failed to bind Axum to listener")?;
    Ok(())
}
