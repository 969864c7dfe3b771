//! Catalog store abstraction
//!
//! The catalog is static reference data created once at start-up. Stores only
//! answer lookups; nothing in the service updates or deletes catalog rows.

use std::future::Future;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{Appliance, Category, Subcategory},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCatalog;
pub use postgres::PostgresCatalog;

/// Which slice of the catalog a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogScope {
    All,
    Category(i64),
    Subcategory(i64),
}

/// Candidate filter applied before scoring
#[derive(Debug, Clone, PartialEq)]
pub struct ApplianceFilter {
    pub max_price: f64,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
}

impl ApplianceFilter {
    pub fn new(max_price: f64) -> Self {
        Self {
            max_price,
            category_id: None,
            subcategory_id: None,
        }
    }

    pub fn with_category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn with_subcategory(mut self, subcategory_id: Option<i64>) -> Self {
        self.subcategory_id = subcategory_id;
        self
    }

    /// A subcategory filter takes precedence over a category filter.
    pub fn scope(&self) -> CatalogScope {
        match (self.subcategory_id, self.category_id) {
            (Some(subcategory_id), _) => CatalogScope::Subcategory(subcategory_id),
            (None, Some(category_id)) => CatalogScope::Category(category_id),
            (None, None) => CatalogScope::All,
        }
    }

    pub fn matches(&self, appliance: &Appliance) -> bool {
        if appliance.price > self.max_price {
            return false;
        }

        match self.scope() {
            CatalogScope::All => true,
            CatalogScope::Category(id) => appliance.category_id == id,
            CatalogScope::Subcategory(id) => appliance.subcategory_id == id,
        }
    }
}

/// Read-only access to categories, subcategories and appliances
///
/// Listings come back in insertion order; rankings rely on that order to
/// break ties.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    /// Subcategories of one category; an unknown id yields an empty list
    async fn list_subcategories(&self, category_id: i64) -> AppResult<Vec<Subcategory>>;

    /// Appliances priced within `filter.max_price` and inside the filter's scope
    async fn list_appliances(&self, filter: &ApplianceFilter) -> AppResult<Vec<Appliance>>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Bounds a catalog read by `timeout`.
pub async fn with_timeout<T, F>(
    timeout: Duration,
    operation: &'static str,
    read: F,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(timeout, read).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                operation,
                timeout_ms = timeout.as_millis() as u64,
                "Catalog read timed out"
            );
            Err(AppError::CatalogUnavailable(format!(
                "{} timed out after {}ms",
                operation,
                timeout.as_millis()
            )))
        }
    }
}
