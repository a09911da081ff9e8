use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

use crate::food::analysis::portion::lenient_number;
use crate::food::api::transport::{HttpRequest, HttpTransport};
use crate::food::api::NutritionProvider;
use crate::food::config::FoodConfig;
use crate::food::types::{round_to, Provenance, ProviderQueryResult};

/// Client for the exact-match nutrition API. Without a credential it never
/// issues a request.
pub struct ExactMatchClient {
    api_key: Option<String>,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl ExactMatchClient {
    pub fn new(config: &FoodConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.exact_match_url.clone(),
            transport,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn query(&self, query: &str) -> Option<ProviderQueryResult> {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                debug!("Exact-match API key not set, skipping");
                return None;
            }
        };

        let request = HttpRequest::get(&self.base_url)
            .query("query", query)
            .header("X-Api-Key", api_key.as_str());

        let body = match self.transport.get_json(request).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Exact-match lookup failed for '{}': {}", query, e);
                return None;
            }
        };

        sum_items(&body)
    }
}

#[async_trait]
impl NutritionProvider for ExactMatchClient {
    fn provenance(&self) -> Provenance {
        Provenance::ExactMatchApi
    }

    async fn lookup(&self, query: &str) -> Option<ProviderQueryResult> {
        self.query(query).await
    }
}

/// Sums every matched item. Accepts a bare array or `{ "items": [...] }`.
/// Missing or non-numeric fields count as zero. kcal is kept as summed; only a
/// total of zero or less is treated as no match.
pub fn sum_items(body: &Value) -> Option<ProviderQueryResult> {
    let items = body
        .as_array()
        .or_else(|| body.get("items").and_then(|i| i.as_array()))?;

    let field = |item: &Value, name: &str| lenient_number(item.get(name)).unwrap_or(0.0);

    let (kcal, protein, carbs, fat) = items.iter().fold((0.0, 0.0, 0.0, 0.0), |acc, item| {
        (
            acc.0 + field(item, "calories"),
            acc.1 + field(item, "protein_g"),
            acc.2 + field(item, "carbohydrates_total_g"),
            acc.3 + field(item, "fat_total_g"),
        )
    });

    if kcal <= 0.0 {
        return None;
    }

    ProviderQueryResult::new(
        kcal,
        round_to(protein, 2),
        round_to(carbs, 2),
        round_to(fat, 2),
    )
}
