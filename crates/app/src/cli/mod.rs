use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use trolley_app::{
    context::{AppContext, EngineSettings},
    store::{AppwriteConfig, AppwriteStore, Collections},
};

mod carts;

#[derive(Debug, Parser)]
#[command(name = "trolley-app", about = "Trolley operations CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Carts(carts::CartsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Carts(command) => carts::run(command).await,
        }
    }
}

/// Connection settings for the Appwrite database holding the carts.
#[derive(Debug, Args)]
pub(crate) struct StoreArgs {
    /// Appwrite API endpoint
    #[arg(long, env = "APPWRITE_ENDPOINT")]
    appwrite_endpoint: String,

    /// Appwrite project id
    #[arg(long, env = "APPWRITE_PROJECT_ID")]
    appwrite_project: String,

    /// Appwrite server API key
    #[arg(long, env = "APPWRITE_API_KEY", hide_env_values = true)]
    appwrite_api_key: String,

    /// Appwrite database id
    #[arg(long, env = "APPWRITE_DATABASE_ID")]
    appwrite_database: String,

    /// Carts collection id
    #[arg(long, env = "CARTS_COLLECTION_ID", default_value = "carts")]
    carts_collection: String,

    /// Cart items collection id
    #[arg(long, env = "CART_ITEMS_COLLECTION_ID", default_value = "cart_items")]
    cart_items_collection: String,

    /// Products collection id
    #[arg(long, env = "PRODUCTS_COLLECTION_ID", default_value = "products")]
    products_collection: String,
}

impl StoreArgs {
    pub(crate) fn context(self) -> AppContext {
        let store = AppwriteStore::new(AppwriteConfig {
            endpoint: self.appwrite_endpoint,
            project: self.appwrite_project,
            api_key: self.appwrite_api_key,
            database: self.appwrite_database,
        });

        let settings = EngineSettings {
            collections: Collections {
                carts: self.carts_collection,
                cart_items: self.cart_items_collection,
                products: self.products_collection,
            },
            ..EngineSettings::default()
        };

        AppContext::new(Arc::new(store), &settings)
    }
}
