//! Donation portal entry point.
//!
//! Runs one session against the configured collaborators: the projects API,
//! the FAQ source and the currency-rate API. Each view (project catalog, FAQ
//! browser, donation workflow) owns its own state and talks to its
//! collaborator through a trait, so any of them can be swapped for an
//! in-memory source.

mod catalog;
mod config;
mod donation;
mod errors;
mod faq;
mod guard;
mod models;
mod rates;
mod render;
mod session;
mod sources;
#[cfg(test)]
mod test_utils;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing_subscriber::EnvFilter;

use config::Config;
use session::PortalState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Shared by every collaborator; the timeout bounds each outstanding request.
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    session::run(Arc::new(PortalState { config, client })).await?;

    Ok(())
}
