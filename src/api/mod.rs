//! API module for ViewScout
//!
//! JSON endpoints over the analyzer for dashboards and external integrations.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::analysis::Analyzer;
use crate::config::ServerConfig;

pub mod handlers;
pub mod models;
pub mod server;

/// API server for handling REST requests
pub struct ApiServer {
    analyzer: Arc<Analyzer>,
    host: String,
    port: u16,
}

impl ApiServer {
    pub fn new(analyzer: Arc<Analyzer>, config: &ServerConfig) -> Self {
        Self {
            analyzer,
            host: config.host.clone(),
            port: config.port,
        }
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting API server on {}:{}", self.host, self.port);
        server::start_http_server(self.analyzer, &self.host, self.port).await
    }
}
