use serde::{Deserialize, Serialize};

pub mod appliance;
pub mod request;

pub use appliance::{
    parse_kwh, AnnualConsumption, Appliance, EnergyRating, RatingTier, ScoredAppliance,
};
pub use request::{EnergyData, RecommendationRequest, RecommendationResponse};

/// Top-level appliance category, e.g. "Kitchen Appliances"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Subcategory within a category, e.g. "Refrigerator"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subcategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
}
