use std::sync::Arc;

use crate::{
    db::Catalog,
    error::AppResult,
    models::{Appliance, Category, Subcategory},
};

use super::{ApplianceFilter, CatalogStore};

/// Catalog held in process memory
///
/// The snapshot is immutable after construction, so clones share it and
/// concurrent reads need no locking.
#[derive(Clone)]
pub struct InMemoryCatalog {
    catalog: Arc<Catalog>,
}

impl InMemoryCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(self.catalog.categories.clone())
    }

    async fn list_subcategories(&self, category_id: i64) -> AppResult<Vec<Subcategory>> {
        Ok(self
            .catalog
            .subcategories
            .iter()
            .filter(|sub| sub.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn list_appliances(&self, filter: &ApplianceFilter) -> AppResult<Vec<Appliance>> {
        Ok(self
            .catalog
            .appliances
            .iter()
            .filter(|appliance| filter.matches(appliance))
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
