//! Startup wiring: store connection and product catalogue.

use std::{fs, io, path::Path};

use thiserror::Error;
use tracing::info;

use trolley_app::{
    context::AppContext,
    domain::products::{ProductSeed, ProductsServiceError},
    store::connect,
};

use crate::config::{ServerConfig, store::MissingSetting};

#[derive(Debug, Error)]
pub(crate) enum StartupError {
    #[error(transparent)]
    Store(#[from] MissingSetting),

    #[error("failed to read product seed file")]
    SeedRead(#[source] io::Error),

    #[error("invalid product seed file")]
    SeedParse(#[source] serde_json::Error),

    #[error("failed to seed products")]
    Seed(#[source] ProductsServiceError),
}

/// Read a JSON array of products.
pub(crate) fn read_seed(path: &Path) -> Result<Vec<ProductSeed>, StartupError> {
    let raw = fs::read_to_string(path).map_err(StartupError::SeedRead)?;

    serde_json::from_str(&raw).map_err(StartupError::SeedParse)
}

/// Connect the store, build the engine and load the product catalogue if one is configured.
pub(crate) async fn app_context(config: &ServerConfig) -> Result<AppContext, StartupError> {
    let store = connect(config.store.settings()?);
    let app = AppContext::new(store, &config.engine.settings());

    if let Some(path) = &config.store.seed_file {
        let products = read_seed(path)?;

        app.products
            .seed(&products)
            .await
            .map_err(StartupError::Seed)?;

        info!(count = products.len(), path = %path.display(), "loaded product catalogue");
    }

    Ok(app)
}

#[cfg(test)]
mod tests {
    use std::env;

    use clap::Parser;
    use testresult::TestResult;
    use trolley::{ProductUuid, Quantity, UserUuid};
    use trolley_app::domain::carts::NewCartItem;
    use uuid::Uuid;

    use super::*;

    fn seed_path(contents: &str) -> TestResult<std::path::PathBuf> {
        let path = env::temp_dir().join(format!("trolley-seed-{}.json", Uuid::now_v7()));

        fs::write(&path, contents)?;

        Ok(path)
    }

    #[test]
    fn malformed_seed_file_is_rejected() -> TestResult {
        let path = seed_path("{ not json")?;

        let result = read_seed(&path);

        fs::remove_file(&path)?;

        assert!(matches!(result, Err(StartupError::SeedParse(_))));

        Ok(())
    }

    #[test]
    fn missing_seed_file_is_rejected() {
        let result = read_seed(Path::new("/nonexistent/trolley-seed.json"));

        assert!(matches!(result, Err(StartupError::SeedRead(_))));
    }

    #[tokio::test]
    async fn seeded_products_can_be_added() -> TestResult {
        let product = ProductUuid::new();
        let path = seed_path(&format!(r#"[{{ "id": "{product}", "price": 450 }}]"#))?;
        let path_arg = path.display().to_string();

        let config =
            ServerConfig::try_parse_from(["trolley-json", "--seed-file", path_arg.as_str()])?;

        let app = app_context(&config).await;

        fs::remove_file(&path)?;

        let app = app?;
        let user = UserUuid::new();

        app.carts
            .add_item(
                user,
                NewCartItem {
                    cart: None,
                    product,
                    quantity: Quantity::new(2)?,
                },
            )
            .await?;

        let view = app.carts.get_cart_view(user).await?.ok_or("cart missing")?;

        assert_eq!(view.cart.total_price, 9_00);

        Ok(())
    }
}
