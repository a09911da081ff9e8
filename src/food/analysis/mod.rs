pub mod local;
pub mod nutrition;
pub mod portion;
pub mod reference;

pub use local::estimate_locally;
pub use nutrition::NutritionEstimator;
