use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{AnnualConsumption, Appliance, Category, EnergyRating, Subcategory},
};

/// Catalog seed compiled into the binary
pub const BUILTIN_SEED: &str = include_str!("../../data/catalog_seed.json");

/// Seed document in the legacy authoring format
///
/// Ratings and consumption are free text, features may be a JSON-encoded
/// string, and appliances point at their subcategory by its 1-based
/// position within the category.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSeed {
    pub categories: Vec<SeedCategory>,
    pub subcategories: Vec<SeedSubcategory>,
    pub appliances: Vec<SeedAppliance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSubcategory {
    pub category_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedAppliance {
    pub code: String,
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub energy_rating: String,
    #[serde(default)]
    pub annual_consumption: Option<String>,
    #[serde(default)]
    pub features: SeedFeatures,
    #[serde(default)]
    pub image: String,
    pub category_id: i64,
    pub subcategory_position: usize,
}

/// Feature list, either as a JSON array or as a JSON-encoded string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeedFeatures {
    List(Vec<String>),
    Encoded(String),
}

impl Default for SeedFeatures {
    fn default() -> Self {
        SeedFeatures::List(Vec::new())
    }
}

impl SeedFeatures {
    /// Decodes the feature list. Encoded strings are parsed as JSON only.
    pub fn decode(self) -> Result<Vec<String>, serde_json::Error> {
        match self {
            SeedFeatures::List(features) => Ok(features),
            SeedFeatures::Encoded(text) if text.trim().is_empty() => Ok(Vec::new()),
            SeedFeatures::Encoded(text) => serde_json::from_str(&text),
        }
    }
}

/// Why a seed row was left out of the catalog
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RejectReason {
    #[error("unknown category {0}")]
    UnknownCategory(i64),

    #[error("category {category_id} has no subcategory at position {position}")]
    UnknownSubcategory { category_id: i64, position: usize },

    #[error("invalid price {0}")]
    InvalidPrice(f64),

    #[error("duplicate appliance code")]
    DuplicateCode,
}

/// Validated catalog contents, ready to load into a store
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    pub appliances: Vec<Appliance>,
}

impl CatalogSeed {
    pub fn builtin() -> AppResult<Self> {
        Self::from_json(BUILTIN_SEED)
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AppError::Seed(format!("Invalid catalog seed: {}", e)))
    }

    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Seed(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Assigns ids, parses legacy fields and drops rows that fail validation.
    pub fn into_catalog(self) -> Catalog {
        let categories: Vec<Category> = self
            .categories
            .into_iter()
            .zip(1..)
            .map(|(category, id)| Category {
                id,
                name: category.name,
            })
            .collect();

        let category_names: HashMap<i64, &str> = categories
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();

        let mut subcategories = Vec::with_capacity(self.subcategories.len());
        for sub in self.subcategories {
            if !category_names.contains_key(&sub.category_id) {
                tracing::warn!(
                    name = %sub.name,
                    category_id = sub.category_id,
                    "Rejected seed subcategory with unknown category"
                );
                continue;
            }
            subcategories.push(Subcategory {
                id: subcategories.len() as i64 + 1,
                category_id: sub.category_id,
                name: sub.name,
            });
        }

        // category id -> subcategories in document order
        let mut by_category: HashMap<i64, Vec<&Subcategory>> = HashMap::new();
        for sub in &subcategories {
            by_category.entry(sub.category_id).or_default().push(sub);
        }

        let mut seen_codes = HashSet::new();
        let mut appliances = Vec::with_capacity(self.appliances.len());
        let mut rejected = 0usize;

        for row in self.appliances {
            let code = row.code.clone();
            match import_appliance(row, &category_names, &by_category, &mut seen_codes) {
                Ok(appliance) => appliances.push(appliance),
                Err(reason) => {
                    rejected += 1;
                    tracing::warn!(code = %code, reason = %reason, "Rejected seed appliance");
                }
            }
        }

        tracing::info!(
            categories = categories.len(),
            subcategories = subcategories.len(),
            appliances = appliances.len(),
            rejected,
            "Catalog seed imported"
        );

        Catalog {
            categories,
            subcategories,
            appliances,
        }
    }
}

fn import_appliance(
    row: SeedAppliance,
    category_names: &HashMap<i64, &str>,
    by_category: &HashMap<i64, Vec<&Subcategory>>,
    seen_codes: &mut HashSet<String>,
) -> Result<Appliance, RejectReason> {
    let category_name = category_names
        .get(&row.category_id)
        .ok_or(RejectReason::UnknownCategory(row.category_id))?;

    let subcategory = row
        .subcategory_position
        .checked_sub(1)
        .and_then(|index| by_category.get(&row.category_id)?.get(index))
        .ok_or(RejectReason::UnknownSubcategory {
            category_id: row.category_id,
            position: row.subcategory_position,
        })?;

    if !(row.price.is_finite() && row.price >= 0.0) {
        return Err(RejectReason::InvalidPrice(row.price));
    }

    if !seen_codes.insert(row.code.clone()) {
        return Err(RejectReason::DuplicateCode);
    }

    let features = row.features.decode().unwrap_or_else(|e| {
        tracing::warn!(code = %row.code, error = %e, "Undecodable feature list, using none");
        Vec::new()
    });

    Ok(Appliance {
        id: row.code,
        name: row.name,
        brand: row.brand,
        price: row.price,
        energy_rating: EnergyRating::new(row.energy_rating),
        annual_consumption: AnnualConsumption::from_label(row.annual_consumption),
        features,
        image_url: row.image,
        category_id: row.category_id,
        subcategory_id: subcategory.id,
        category_name: category_name.to_string(),
        subcategory_name: subcategory.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RatingTier;
    use serde_json::json;

    fn seed(appliances: serde_json::Value) -> CatalogSeed {
        let document = json!({
            "categories": [{"name": "Kitchen Appliances"}, {"name": "Laundry"}],
            "subcategories": [
                {"category_id": 1, "name": "Refrigerator"},
                {"category_id": 1, "name": "Microwave Oven"},
                {"category_id": 2, "name": "Washing Machine"},
                {"category_id": 9, "name": "Orphan"}
            ],
            "appliances": appliances,
        });
        serde_json::from_value(document).unwrap()
    }

    fn row(code: &str, category_id: i64, position: usize) -> serde_json::Value {
        json!({
            "code": code,
            "name": format!("Item {}", code),
            "brand": "Acme",
            "price": 1000,
            "energy_rating": "4 Star",
            "annual_consumption": "180 kWh",
            "features": ["Inverter"],
            "image": format!("appliance_images/{}.jpg", code),
            "category_id": category_id,
            "subcategory_position": position,
        })
    }

    #[test]
    fn test_builtin_seed_imports_cleanly() {
        let catalog = CatalogSeed::builtin().unwrap().into_catalog();

        assert_eq!(catalog.categories.len(), 7);
        assert_eq!(catalog.subcategories.len(), 33);
        assert_eq!(catalog.appliances.len(), 330);

        let first = &catalog.appliances[0];
        assert_eq!(first.id, "RF001");
        assert_eq!(first.subcategory_name, "Refrigerator");
        assert_eq!(first.energy_rating.tier(), RatingTier::FiveStar);
        assert_eq!(first.annual_kwh(), Some(180.0));
    }

    #[test]
    fn test_subcategory_position_resolves_within_category() {
        let catalog = seed(json!([row("A", 1, 2), row("B", 2, 1)])).into_catalog();

        assert_eq!(catalog.appliances[0].subcategory_id, 2);
        assert_eq!(catalog.appliances[0].subcategory_name, "Microwave Oven");
        assert_eq!(catalog.appliances[1].subcategory_id, 3);
        assert_eq!(catalog.appliances[1].category_name, "Laundry");
    }

    #[test]
    fn test_orphan_subcategory_is_dropped() {
        let catalog = seed(json!([])).into_catalog();
        assert_eq!(catalog.subcategories.len(), 3);
        assert!(catalog.subcategories.iter().all(|s| s.name != "Orphan"));
    }

    #[test]
    fn test_invalid_rows_are_rejected() {
        let mut negative = row("NEG", 1, 1);
        negative["price"] = json!(-5);

        let catalog = seed(json!([
            row("OK", 1, 1),
            row("CAT", 7, 1),
            row("POS", 1, 3),
            row("ZERO", 1, 0),
            negative,
            row("OK", 2, 1),
        ]))
        .into_catalog();

        assert_eq!(catalog.appliances.len(), 1);
        assert_eq!(catalog.appliances[0].category_id, 1);
    }

    #[test]
    fn test_import_reasons() {
        let category_names: HashMap<i64, &str> = HashMap::from([(1, "Kitchen Appliances")]);
        let by_category = HashMap::new();
        let mut seen = HashSet::new();

        let parsed: SeedAppliance = serde_json::from_value(row("X", 2, 1)).unwrap();
        assert_eq!(
            import_appliance(parsed, &category_names, &by_category, &mut seen),
            Err(RejectReason::UnknownCategory(2))
        );

        let parsed: SeedAppliance = serde_json::from_value(row("X", 1, 1)).unwrap();
        assert_eq!(
            import_appliance(parsed, &category_names, &by_category, &mut seen),
            Err(RejectReason::UnknownSubcategory {
                category_id: 1,
                position: 1
            })
        );
    }

    #[test]
    fn test_encoded_features_are_decoded_as_json() {
        let mut encoded = row("ENC", 1, 1);
        encoded["features"] = json!("[\"Smart Inverter\", \"Hygiene Fresh+\"]");
        let mut broken = row("BAD", 1, 1);
        broken["features"] = json!("__import__('os')");

        let catalog = seed(json!([encoded, broken])).into_catalog();

        assert_eq!(
            catalog.appliances[0].features,
            vec!["Smart Inverter", "Hygiene Fresh+"]
        );
        assert!(catalog.appliances[1].features.is_empty());
    }

    #[test]
    fn test_blank_consumption_is_absent() {
        let mut blank = row("BL", 1, 1);
        blank["annual_consumption"] = json!("");
        let mut missing = row("MS", 1, 1);
        missing["annual_consumption"] = serde_json::Value::Null;

        let catalog = seed(json!([blank, missing])).into_catalog();

        assert!(catalog.appliances[0].annual_consumption.is_none());
        assert!(catalog.appliances[1].annual_consumption.is_none());
    }

    #[test]
    fn test_malformed_seed_document() {
        let result = CatalogSeed::from_json("{\"categories\": []}");
        assert!(matches!(result, Err(AppError::Seed(_))));
    }
}
