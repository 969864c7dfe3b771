use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{Category, Subcategory},
    routes::AppState,
    services::catalog::with_timeout,
};

/// Handler for listing categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = with_timeout(
        state.catalog_timeout,
        "list_categories",
        state.catalog.list_categories(),
    )
    .await?;
    Ok(Json(categories))
}

/// Handler for listing the subcategories of one category
pub async fn list_subcategories(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<i64>,
) -> AppResult<Json<Vec<Subcategory>>> {
    let subcategories = with_timeout(
        state.catalog_timeout,
        "list_subcategories",
        state.catalog.list_subcategories(category_id),
    )
    .await?;
    Ok(Json(subcategories))
}
