pub mod postgres;
pub mod seed;

pub use postgres::{create_pool, run_migrations};
pub use seed::{Catalog, CatalogSeed};
