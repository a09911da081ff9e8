use std::sync::Arc;

use log::{debug, info};

use crate::food::analysis::local::estimate_locally;
use crate::food::api::community_db::CommunityDbClient;
use crate::food::api::exact_match::ExactMatchClient;
use crate::food::api::transport::{HttpTransport, ReqwestTransport};
use crate::food::api::NutritionProvider;
use crate::food::config::FoodConfig;
use crate::food::error::NutritionError;
use crate::food::types::NutritionEstimate;

/// Tries each provider in order and tags the first populated answer with that
/// provider's provenance. Providers are queried one after another; a later one
/// is only asked when every earlier one came back empty.
#[derive(Clone)]
pub struct NutritionEstimator {
    providers: Vec<Arc<dyn NutritionProvider>>,
}

impl NutritionEstimator {
    pub fn new(providers: Vec<Arc<dyn NutritionProvider>>) -> Self {
        Self { providers }
    }

    /// Exact-match API first, community database second.
    pub fn from_config(config: &FoodConfig) -> Result<Self, NutritionError> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(config)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: &FoodConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let exact = ExactMatchClient::new(config, transport.clone());
        if !exact.is_configured() {
            info!("No exact-match API key configured; using the community database only");
        }
        let community = CommunityDbClient::new(config, transport);
        let providers: Vec<Arc<dyn NutritionProvider>> = vec![Arc::new(exact), Arc::new(community)];
        Self::new(providers)
    }

    /// Never fails. Reports `none` with zeroed values when no provider answers.
    pub async fn estimate(&self, query: &str) -> NutritionEstimate {
        for provider in &self.providers {
            if let Some(result) = provider.lookup(query).await {
                debug!("'{}' answered by {}", query, provider.provenance().as_str());
                return NutritionEstimate::from_provider(query, result, provider.provenance());
            }
        }
        debug!("No provider had data for '{}'", query);
        NutritionEstimate::unavailable(query)
    }

    /// Remote estimate, falling back to the offline table when nothing answered.
    pub async fn estimate_with_local_fallback(&self, query: &str) -> NutritionEstimate {
        let estimate = self.estimate(query).await;
        if estimate.is_unavailable() {
            estimate_locally(query)
        } else {
            estimate
        }
    }
}
