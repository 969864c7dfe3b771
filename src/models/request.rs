use serde::{de, Deserialize, Deserializer, Serialize};

use super::ScoredAppliance;

pub const DEFAULT_BUDGET: f64 = 50_000.0;
pub const DEFAULT_ECO_PRIORITY: f64 = 0.5;

/// Body of `POST /api/recommend`
///
/// Browser forms post select values as strings and empty selections as
/// `null`, so ids and numbers are accepted either as JSON numbers or as
/// numeric strings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecommendationRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_id")]
    pub subcategory_id: Option<i64>,
    #[serde(default = "default_budget", deserialize_with = "lenient_number")]
    pub budget: f64,
    #[serde(default = "default_eco_priority", deserialize_with = "lenient_number")]
    pub eco_priority: f64,
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            category_id: None,
            subcategory_id: None,
            budget: DEFAULT_BUDGET,
            eco_priority: DEFAULT_ECO_PRIORITY,
        }
    }
}

fn default_budget() -> f64 {
    DEFAULT_BUDGET
}

fn default_eco_priority() -> f64 {
    DEFAULT_ECO_PRIORITY
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts `null`, `""`, an integer or an integer string. Zero counts as "no filter".
fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrString>::deserialize(deserializer)?;
    let id = match raw {
        None => None,
        Some(NumberOrString::Int(id)) => Some(id),
        Some(NumberOrString::Float(value)) if value.fract() == 0.0 => Some(value as i64),
        Some(NumberOrString::Float(value)) => {
            return Err(de::Error::custom(format!("invalid id: {}", value)))
        }
        Some(NumberOrString::Text(text)) if text.trim().is_empty() => None,
        Some(NumberOrString::Text(text)) => Some(
            text.trim()
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("invalid id: {:?}", text)))?,
        ),
    };

    Ok(id.filter(|id| *id != 0))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(value) => value as f64,
        NumberOrString::Float(value) => value,
        NumberOrString::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("expected a number, got {:?}", text)))?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom("expected a finite number"))
    }
}

/// Process-wide energy pricing reported with every recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergyData {
    pub price_per_kwh: f64,
    pub carbon_intensity: u32,
    /// Date the figures were loaded, `YYYY-MM-DD`
    pub last_updated: String,
}

impl EnergyData {
    /// Energy figures stamped with today's local date
    pub fn new(price_per_kwh: f64, carbon_intensity: u32) -> Self {
        Self {
            price_per_kwh,
            carbon_intensity,
            last_updated: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Response of `POST /api/recommend`
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<ScoredAppliance>,
    pub eco_picks: Vec<ScoredAppliance>,
    pub energy_data: EnergyData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<RecommendationRequest, serde_json::Error> {
        serde_json::from_str(body)
    }

    #[test]
    fn test_empty_body_uses_defaults() {
        assert_eq!(parse("{}").unwrap(), RecommendationRequest::default());
    }

    #[test]
    fn test_accepts_form_style_values() {
        let request = parse(
            r#"{"category_id": "3", "subcategory_id": null, "budget": "30000", "eco_priority": 0.8}"#,
        )
        .unwrap();

        assert_eq!(request.category_id, Some(3));
        assert_eq!(request.subcategory_id, None);
        assert_eq!(request.budget, 30000.0);
        assert_eq!(request.eco_priority, 0.8);
    }

    #[test]
    fn test_empty_and_zero_ids_mean_no_filter() {
        let request = parse(r#"{"category_id": "", "subcategory_id": 0}"#).unwrap();
        assert_eq!(request.category_id, None);
        assert_eq!(request.subcategory_id, None);
    }

    #[test]
    fn test_rejects_non_numeric_budget() {
        assert!(parse(r#"{"budget": "lots"}"#).is_err());
        assert!(parse(r#"{"eco_priority": true}"#).is_err());
        assert!(parse(r#"{"category_id": "kitchen"}"#).is_err());
    }

    #[test]
    fn test_energy_data_date_format() {
        let energy = EnergyData::new(7.5, 280);
        assert!(chrono::NaiveDate::parse_from_str(&energy.last_updated, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_out_of_range_eco_priority_is_accepted() {
        let request = parse(r#"{"eco_priority": 1.5}"#).unwrap();
        assert_eq!(request.eco_priority, 1.5);
    }
}
