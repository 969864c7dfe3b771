use crate::models::{parse_kwh, ScoredAppliance};

/// Marker returned when no cost can be derived from the consumption label
pub const COST_NOT_AVAILABLE: &str = "N/A";

/// Estimated yearly running cost, formatted with two decimals.
///
/// Returns [`COST_NOT_AVAILABLE`] when `consumption` is absent or does not
/// parse as `"<number> kWh"`.
pub fn annual_cost(consumption: Option<&str>, price_per_kwh: f64) -> String {
    match consumption.and_then(parse_kwh) {
        Some(kwh) => format!("{:.2}", kwh * price_per_kwh),
        None => COST_NOT_AVAILABLE.to_string(),
    }
}

/// Fills `annual_cost` on every item
pub fn annotate_costs(items: &mut [ScoredAppliance], price_per_kwh: f64) {
    for item in items.iter_mut() {
        let cost = annual_cost(item.appliance.consumption_label(), price_per_kwh);
        item.annual_cost = Some(cost);
    }
}
