//! Store Config

use std::path::PathBuf;

use clap::Args;
use trolley_app::store::{AppwriteConfig, StoreSettings};

/// Document store backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreBackend {
    /// Process-local store, for development and tests.
    Memory,

    /// Appwrite Databases.
    Appwrite,
}

/// Document store settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Store backend (memory, appwrite)
    #[arg(
        id = "backend",
        long = "store",
        env = "STORE_BACKEND",
        value_enum,
        default_value_t = StoreBackend::Memory
    )]
    pub backend: StoreBackend,

    /// Appwrite API endpoint
    #[arg(long, env = "APPWRITE_ENDPOINT", required_if_eq("backend", "appwrite"))]
    pub appwrite_endpoint: Option<String>,

    /// Appwrite project id
    #[arg(long, env = "APPWRITE_PROJECT_ID", required_if_eq("backend", "appwrite"))]
    pub appwrite_project: Option<String>,

    /// Appwrite server API key
    #[arg(
        long,
        env = "APPWRITE_API_KEY",
        hide_env_values = true,
        required_if_eq("backend", "appwrite")
    )]
    pub appwrite_api_key: Option<String>,

    /// Appwrite database id
    #[arg(long, env = "APPWRITE_DATABASE_ID", required_if_eq("backend", "appwrite"))]
    pub appwrite_database: Option<String>,

    /// JSON file of `{ "id", "price" }` products loaded into the store at startup
    #[arg(long, env = "PRODUCT_SEED_FILE")]
    pub seed_file: Option<PathBuf>,
}

/// A required store setting was not provided.
#[derive(Debug, thiserror::Error)]
#[error("missing store setting: {0}")]
pub(crate) struct MissingSetting(pub(crate) &'static str);

impl StoreConfig {
    /// Resolve the backend settings.
    ///
    /// # Errors
    ///
    /// Returns [`MissingSetting`] when the Appwrite backend lacks a connection value.
    pub(crate) fn settings(&self) -> Result<StoreSettings, MissingSetting> {
        fn required(value: Option<&str>, name: &'static str) -> Result<String, MissingSetting> {
            value.map(str::to_string).ok_or(MissingSetting(name))
        }

        match self.backend {
            StoreBackend::Memory => Ok(StoreSettings::Memory),
            StoreBackend::Appwrite => Ok(StoreSettings::Appwrite(AppwriteConfig {
                endpoint: required(self.appwrite_endpoint.as_deref(), "APPWRITE_ENDPOINT")?,
                project: required(self.appwrite_project.as_deref(), "APPWRITE_PROJECT_ID")?,
                api_key: required(self.appwrite_api_key.as_deref(), "APPWRITE_API_KEY")?,
                database: required(self.appwrite_database.as_deref(), "APPWRITE_DATABASE_ID")?,
            })),
        }
    }
}
