pub mod community_db;
pub mod exact_match;
pub mod traits;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

// Re-export common types
pub use community_db::CommunityDbClient;
pub use exact_match::ExactMatchClient;
pub use traits::NutritionProvider;
pub use transport::{HttpRequest, HttpTransport, ReqwestTransport};
