//! Server configuration module

use clap::Parser;

use crate::config::{engine::EngineConfig, logging::LoggingConfig, store::StoreConfig};

pub(crate) mod engine;
pub(crate) mod logging;
pub(crate) mod store;

pub(crate) use logging::LogFormat;
pub(crate) use store::StoreBackend;

/// Trolley JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "trolley-json", about = "Trolley JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server host address
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "SERVER_PORT", default_value = "8698")]
    pub port: u16,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Document store settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Reconciler and updater tunables.
    #[command(flatten)]
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
