// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use pneumonia_detection_api::{
    api::{http_server::start_server, AppState},
    classifier::{OnnxPneumoniaModel, PneumoniaClassifier},
    config::ServerConfig,
    version,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Values in .env are picked up as if exported
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();

    println!("🚀 Starting Pneumonia Detection API...\n");
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!();
    tracing::info!("{}", version::get_version_info());

    let addr = config.socket_addr().await?;

    // The model is loaded exactly once, before the listener binds
    println!("🧠 Loading pneumonia model from {}...", config.model_path.display());
    let model = OnnxPneumoniaModel::load(&config.model_path, config.intra_threads)
        .with_context(|| format!("Failed to load model from {}", config.model_path.display()))?;
    println!("✅ Model loaded");

    let classifier = PneumoniaClassifier::new(Arc::new(model));
    let state = AppState::new(classifier);

    println!("🌐 Starting API server on http://{}", addr);
    start_server(state, addr, &config.allowed_origin).await?;

    println!("👋 Server stopped");
    Ok(())
}
