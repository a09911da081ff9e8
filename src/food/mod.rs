pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod types;

pub use analysis::{estimate_locally, NutritionEstimator};
pub use config::FoodConfig;
pub use error::NutritionError;
pub use types::{Macros, NutritionEstimate, Provenance, ProviderQueryResult};
