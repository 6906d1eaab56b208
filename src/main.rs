mod analysis;
mod core;
mod engine;
mod playground;
mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::config::AppConfig;
use crate::core::languages::LanguageTable;
use crate::engine::Judge0Client;
use crate::playground::{InputLimits, Playground};
use crate::server::{start_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("code_compiler=info".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Load language configurations
    let languages = match &config.languages_path {
        Some(path) => LanguageTable::load(path)?,
        None => LanguageTable::embedded()?,
    };
    info!(
        "Loaded {} languages (default={})",
        languages.list().len(),
        languages.default_language().id
    );

    let judge0 =
        Judge0Client::new(config.judge0.clone()).context("Failed to build Judge0 client")?;
    if config.judge0.api_key.is_none() {
        info!("RAPIDAPI_KEY not set, sending unauthenticated requests");
    }
    info!(
        "Judge0 at {} (base64={}, poll={}ms x {})",
        config.judge0.base_url,
        config.judge0.base64_encoded,
        config.judge0.poll_interval.as_millis(),
        config.judge0.max_polls
    );

    let playground = Playground::new(
        Arc::new(languages),
        Arc::new(judge0),
        InputLimits::from(&config),
    );

    start_server(&config.bind_addr, AppState::new(playground)).await
}
