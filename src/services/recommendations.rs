use std::time::{Duration, Instant};

use crate::{
    error::AppResult,
    models::{EnergyData, RecommendationRequest, RecommendationResponse},
    services::{
        catalog::{with_timeout, ApplianceFilter, CatalogStore},
        cost::annotate_costs,
        scoring,
    },
};

/// Builds the recommendation response for one request
///
/// Fetches the eligible candidates from the catalog (budget and
/// category/subcategory filter), scores and ranks them, then attaches an
/// annual running cost to every returned item.
pub async fn get_recommendations(
    catalog: &dyn CatalogStore,
    energy: &EnergyData,
    catalog_timeout: Duration,
    request: RecommendationRequest,
) -> AppResult<RecommendationResponse> {
    let start = Instant::now();

    // Budget and scope are pushed down to the store
    let filter = ApplianceFilter::new(request.budget)
        .with_category(request.category_id)
        .with_subcategory(request.subcategory_id);

    let candidates = with_timeout(
        catalog_timeout,
        "list_appliances",
        catalog.list_appliances(&filter),
    )
    .await?;

    tracing::info!(
        store = catalog.name(),
        scope = ?filter.scope(),
        budget = request.budget,
        eco_priority = request.eco_priority,
        candidates = candidates.len(),
        "Scoring candidates"
    );

    // Rank, then pick eco options from the same candidates
    let scoring::Recommendation {
        mut ranked,
        mut eco_picks,
    } = scoring::recommend(candidates, request.budget, request.eco_priority);

    // Price only the returned items
    annotate_costs(&mut ranked, energy.price_per_kwh);
    annotate_costs(&mut eco_picks, energy.price_per_kwh);

    tracing::info!(
        ranked = ranked.len(),
        eco_picks = eco_picks.len(),
        processing_time_ms = start.elapsed().as_millis() as u64,
        "Recommendations ready"
    );

    Ok(RecommendationResponse {
        recommendations: ranked,
        eco_picks,
        energy_data: energy.clone(),
    })
}
