use std::cmp::Ordering;

use crate::models::{Appliance, ScoredAppliance};

/// Maximum number of entries in the ranked list
pub const RANKED_LIMIT: usize = 50;

/// Maximum number of eco picks
pub const ECO_PICKS_LIMIT: usize = 3;

/// Consumption below this qualifies an item as an eco pick regardless of rating
pub const ECO_CONSUMPTION_THRESHOLD_KWH: f64 = 200.0;

/// Output of a scoring pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendation {
    pub ranked: Vec<ScoredAppliance>,
    pub eco_picks: Vec<ScoredAppliance>,
}

/// Price fit in `[0, 1]`; cheaper relative to the budget scores higher.
///
/// A zero, negative or non-finite budget gives every candidate a price
/// score of 0, leaving the ranking to energy efficiency alone.
pub fn price_score(price: f64, budget: f64) -> f64 {
    if !(budget.is_finite() && budget > 0.0) {
        return 0.0;
    }

    1.0 - (price / budget).min(1.0)
}

/// Weighted blend of energy efficiency and price fit.
///
/// `eco_priority` is not clamped: values outside `[0, 1]` extrapolate linearly.
pub fn score_appliance(appliance: &Appliance, budget: f64, eco_priority: f64) -> f64 {
    let energy_score = f64::from(appliance.energy_rating.energy_score());
    let price_score = price_score(appliance.price, budget);

    energy_score * eco_priority + price_score * (1.0 - eco_priority)
}

/// Whether an item belongs in the eco picks highlight
pub fn is_eco_pick(appliance: &Appliance) -> bool {
    appliance.energy_rating.is_five_star()
        || appliance
            .annual_kwh()
            .is_some_and(|kwh| kwh < ECO_CONSUMPTION_THRESHOLD_KWH)
}

/// Scores and ranks an already-filtered candidate set.
///
/// Candidates must already satisfy the budget and category constraints.
/// `ranked` is a stable descending sort by score, cut to [`RANKED_LIMIT`].
/// `eco_picks` are the first [`ECO_PICKS_LIMIT`] qualifying items in
/// candidate order, taken before sorting and truncation.
pub fn recommend(candidates: Vec<Appliance>, budget: f64, eco_priority: f64) -> Recommendation {
    let scored: Vec<ScoredAppliance> = candidates
        .into_iter()
        .map(|appliance| {
            let score = score_appliance(&appliance, budget, eco_priority);
            ScoredAppliance::new(appliance, score)
        })
        .collect();

    let eco_picks: Vec<ScoredAppliance> = scored
        .iter()
        .filter(|item| is_eco_pick(&item.appliance))
        .take(ECO_PICKS_LIMIT)
        .cloned()
        .collect();

    let mut ranked = scored;
    ranked.sort_by(|a, b| descending(a.score, b.score));
    ranked.truncate(RANKED_LIMIT);

    Recommendation { ranked, eco_picks }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
