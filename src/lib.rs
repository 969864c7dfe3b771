//! Energy-efficient appliance catalog and recommendation service.
//!
//! Serves a static appliance catalog over HTTP and ranks candidates within
//! a budget by a weighted blend of energy rating and price fit.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::Config;
use db::{Catalog, CatalogSeed};
use models::EnergyData;
use routes::AppState;
use services::catalog::{CatalogStore, InMemoryCatalog, PostgresCatalog};

/// Reads the configured seed, falling back to the built-in catalog
pub async fn load_catalog(config: &Config) -> anyhow::Result<Catalog> {
    let seed = match &config.seed_path {
        Some(path) => CatalogSeed::from_path(path).await?,
        None => CatalogSeed::builtin()?,
    };
    Ok(seed.into_catalog())
}

/// Builds the catalog store selected by `config` and seeds it when empty
pub async fn build_catalog_store(config: &Config) -> anyhow::Result<Arc<dyn CatalogStore>> {
    let catalog = load_catalog(config).await?;

    match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url).await?;
            db::run_migrations(&pool).await?;

            let store = PostgresCatalog::new(pool);
            store.seed_if_empty(&catalog).await?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryCatalog::new(catalog))),
    }
}

/// Assembles the shared handler state
pub fn build_state(config: &Config, catalog: Arc<dyn CatalogStore>) -> Arc<AppState> {
    Arc::new(AppState {
        catalog,
        energy_data: EnergyData::new(config.price_per_kwh, config.carbon_intensity),
        catalog_timeout: config.catalog_timeout(),
        image_dir: config.image_dir.clone(),
    })
}
