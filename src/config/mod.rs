// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration from command-line flags and environment variables

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL_PATH: &str = "./model/pneumonia_model.onnx";
/// React dev server
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_INTRA_THREADS: usize = 4;

/// Pneumonia Detection API server
#[derive(Parser, Debug, Clone)]
#[command(name = "pneumonia-detection-api")]
#[command(version)]
#[command(about = "Serve a chest X-ray pneumonia classifier over HTTP", long_about = None)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to (IP literal or hostname)
    #[arg(long, env = "API_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to bind the HTTP listener to
    #[arg(long, env = "API_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path to the exported ONNX model
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// The single origin allowed to call the API cross-origin
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,

    /// ONNX Runtime intra-op thread count
    #[arg(long, env = "ONNX_INTRA_THREADS", default_value_t = DEFAULT_INTRA_THREADS)]
    pub intra_threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            intra_threads: DEFAULT_INTRA_THREADS,
        }
    }
}

impl ServerConfig {
    /// Resolve `host:port` into the socket address to bind
    ///
    /// Hostnames such as `localhost` go through the system resolver; the
    /// first resolved address is used.
    pub async fn socket_addr(&self) -> Result<SocketAddr> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))?
            .next()
            .with_context(|| {
                format!(
                    "Invalid listen address {}:{}: host resolved to no addresses",
                    self.host, self.port
                )
            })
    }
}
