pub mod api;
pub mod commands;
pub mod config;
pub mod food;

// Re-export commonly used items
pub use food::{estimate_locally, FoodConfig, NutritionEstimate, NutritionEstimator, Provenance};
