use log::debug;

use crate::food::analysis::portion::{extract_quantity, parse_grams};
use crate::food::analysis::reference::{find_heuristic, find_reference, GENERIC_ESTIMATE};
use crate::food::types::{FoodReferenceEntry, Macros, NutritionEstimate, Provenance};

/// Offline estimate from the built-in table and keyword heuristics. Always
/// answers, never touches the network.
pub fn estimate_locally(description: &str) -> NutritionEstimate {
    let normalized = description.trim().to_lowercase();

    if let Some(entry) = find_reference(&normalized) {
        let multiplier = unit_multiplier(entry, &normalized);
        debug!("Local table match '{}' x{} ({})", entry.match_key, multiplier, entry.unit_label);
        return NutritionEstimate::new(
            description,
            entry.kcal * multiplier,
            Macros {
                protein_g: entry.protein_g * multiplier,
                carbs_g: entry.carbs_g * multiplier,
                fat_g: entry.fat_g * multiplier,
            },
            Provenance::LocalTable,
        );
    }

    if let Some(h) = find_heuristic(&normalized) {
        debug!("Local keyword match '{}'", h.keyword);
        return NutritionEstimate::new(description, h.kcal, h.macros, Provenance::LocalHeuristic);
    }

    NutritionEstimate::new(
        description,
        GENERIC_ESTIMATE.kcal,
        GENERIC_ESTIMATE.macros,
        Provenance::LocalGeneric,
    )
}

/// Gram amounts scale weight-based entries by weight; otherwise the first bare
/// count is the number of units, defaulting to one.
fn unit_multiplier(entry: &FoodReferenceEntry, normalized: &str) -> f64 {
    if let (Some(unit_grams), Some(grams)) = (entry.unit_grams, parse_grams(normalized)) {
        return grams / unit_grams;
    }
    extract_quantity(normalized).unwrap_or(1.0)
}
