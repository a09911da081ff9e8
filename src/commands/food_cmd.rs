use colored::Colorize;

use crate::food::analysis::local::estimate_locally;
use crate::food::analysis::nutrition::NutritionEstimator;
use crate::food::types::NutritionEstimate;

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandOptions {
    /// `nutrition` behaves like `local` and nothing leaves the machine.
    pub offline: bool,
    /// Estimates are printed as JSON instead of the text card.
    pub json: bool,
}

pub async fn handle_command(
    input: &str,
    estimator: &NutritionEstimator,
    options: CommandOptions,
) -> Result<String, String> {
    let input = input.trim();

    match input.split_whitespace().next() {
        Some("nutrition") => {
            let food_item = input.trim_start_matches("nutrition").trim();
            if food_item.is_empty() {
                return Err("Please specify a food item to analyze.".to_string());
            }
            let estimate = if options.offline {
                estimate_locally(food_item)
            } else {
                estimator.estimate_with_local_fallback(food_item).await
            };
            format_estimate(&estimate, options.json)
        }
        Some("local") => {
            let food_item = input.trim_start_matches("local").trim();
            if food_item.is_empty() {
                return Err("Please specify a food item to estimate.".to_string());
            }
            format_estimate(&estimate_locally(food_item), options.json)
        }
        _ => Err("Available commands:\n- nutrition <food_item> (Online lookup)\n- local <food_item> (Offline estimate)".to_string()),
    }
}

/// Pretty JSON when `json` is set, otherwise the text card.
pub fn format_estimate(estimate: &NutritionEstimate, json: bool) -> Result<String, String> {
    if json {
        serde_json::to_string_pretty(estimate).map_err(|e| format!("Failed to encode estimate: {}", e))
    } else {
        Ok(render_estimate(estimate))
    }
}

pub fn render_estimate(estimate: &NutritionEstimate) -> String {
    format!(
        "🍽️ {}\n🔥 Calories: {:.0} kcal\n💪 Protein: {:.1} g\n🍞 Carbs: {:.1} g\n🧈 Fat: {:.1} g\n📎 Source: {}",
        estimate.description.bold(),
        estimate.kcal,
        estimate.macros.protein_g,
        estimate.macros.carbs_g,
        estimate.macros.fat_g,
        estimate.provenance.as_str(),
    )
}
