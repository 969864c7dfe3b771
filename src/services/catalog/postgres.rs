use sqlx::{types::Json, FromRow, PgPool, Postgres, QueryBuilder};

use crate::{
    db::Catalog,
    error::AppResult,
    models::{AnnualConsumption, Appliance, Category, EnergyRating, Subcategory},
};

use super::{ApplianceFilter, CatalogScope, CatalogStore};

const APPLIANCE_SELECT: &str = r#"
    SELECT a.id, a.name, a.brand, a.price, a.energy_rating, a.annual_consumption,
           a.features, a.image_url, a.category_id, a.subcategory_id,
           c.name AS category_name, s.name AS subcategory_name
    FROM appliances a
    JOIN categories c ON a.category_id = c.id
    JOIN subcategories s ON a.subcategory_id = s.id
    WHERE a.price <= "#;

/// Advisory lock key serializing concurrent seeding across processes
const SEED_LOCK_KEY: i64 = 0x6563_6f73_6d61_7274;

/// Catalog store backed by PostgreSQL
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct ApplianceRow {
    id: String,
    name: String,
    brand: String,
    price: f64,
    energy_rating: String,
    annual_consumption: Option<String>,
    features: Json<Vec<String>>,
    image_url: String,
    category_id: i64,
    subcategory_id: i64,
    category_name: String,
    subcategory_name: String,
}

impl From<ApplianceRow> for Appliance {
    fn from(row: ApplianceRow) -> Self {
        Appliance {
            id: row.id,
            name: row.name,
            brand: row.brand,
            price: row.price,
            energy_rating: EnergyRating::new(row.energy_rating),
            annual_consumption: AnnualConsumption::from_label(row.annual_consumption),
            features: row.features.0,
            image_url: row.image_url,
            category_id: row.category_id,
            subcategory_id: row.subcategory_id,
            category_name: row.category_name,
            subcategory_name: row.subcategory_name,
        }
    }
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads `catalog` when the store holds no categories yet.
    ///
    /// Runs in one transaction, so a failed seed leaves the tables empty.
    /// Concurrent callers queue on an advisory lock and only the first one
    /// writes. Returns whether anything was written.
    pub async fn seed_if_empty(&self, catalog: &Catalog) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Held until commit or rollback
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SEED_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&mut *tx)
            .await?;

        if existing > 0 {
            tracing::info!(categories = existing, "Catalog already seeded");
            return Ok(false);
        }

        for category in &catalog.categories {
            sqlx::query(
                "INSERT INTO categories (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
            )
            .bind(category.id)
            .bind(&category.name)
            .execute(&mut *tx)
            .await?;
        }

        for sub in &catalog.subcategories {
            sqlx::query(
                r#"
                INSERT INTO subcategories (id, category_id, name)
                VALUES ($1, $2, $3)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(sub.id)
            .bind(sub.category_id)
            .bind(&sub.name)
            .execute(&mut *tx)
            .await?;
        }

        for appliance in &catalog.appliances {
            sqlx::query(
                r#"
                INSERT INTO appliances
                    (id, name, brand, price, energy_rating, annual_consumption,
                     features, image_url, category_id, subcategory_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(&appliance.id)
            .bind(&appliance.name)
            .bind(&appliance.brand)
            .bind(appliance.price)
            .bind(appliance.energy_rating.label())
            .bind(appliance.consumption_label())
            .bind(Json(&appliance.features))
            .bind(&appliance.image_url)
            .bind(appliance.category_id)
            .bind(appliance.subcategory_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            categories = catalog.categories.len(),
            subcategories = catalog.subcategories.len(),
            appliances = catalog.appliances.len(),
            "Catalog seeded"
        );

        Ok(true)
    }
}

/// Builds the appliance listing query for a filter
fn appliance_query(filter: &ApplianceFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(APPLIANCE_SELECT);
    query.push_bind(filter.max_price);

    match filter.scope() {
        CatalogScope::All => {}
        CatalogScope::Category(id) => {
            query.push(" AND a.category_id = ").push_bind(id);
        }
        CatalogScope::Subcategory(id) => {
            query.push(" AND a.subcategory_id = ").push_bind(id);
        }
    }

    query.push(" ORDER BY a.position");
    query
}

#[async_trait::async_trait]
impl CatalogStore for PostgresCatalog {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect())
    }

    async fn list_subcategories(&self, category_id: i64) -> AppResult<Vec<Subcategory>> {
        let rows: Vec<(i64, i64, String)> = sqlx::query_as(
            "SELECT id, category_id, name FROM subcategories WHERE category_id = $1 ORDER BY id",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, category_id, name)| Subcategory {
                id,
                category_id,
                name,
            })
            .collect())
    }

    async fn list_appliances(&self, filter: &ApplianceFilter) -> AppResult<Vec<Appliance>> {
        let mut query = appliance_query(filter);
        let rows: Vec<ApplianceRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(rows = rows.len(), scope = ?filter.scope(), "Appliances fetched");

        Ok(rows.into_iter().map(Appliance::from).collect())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
