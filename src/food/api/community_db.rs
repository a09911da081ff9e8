use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

use crate::food::analysis::portion::{lenient_number, parse_grams, parse_package_grams};
use crate::food::api::transport::{HttpRequest, HttpTransport};
use crate::food::api::NutritionProvider;
use crate::food::config::FoodConfig;
use crate::food::types::{round_to, Provenance, ProviderQueryResult};

pub const KJ_PER_KCAL: f64 = 4.184;
pub const DEFAULT_PORTION_GRAMS: f64 = 100.0;

const USABLE_NUTRIENT_KEYS: &[&str] = &[
    "energy-kcal_100g",
    "energy_100g",
    "proteins_100g",
    "carbohydrates_100g",
    "fat_100g",
];

/// Where the assumed portion size came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PortionSource {
    Query,
    ServingSize,
    ProductQuantity,
    QuantityText,
    Default,
}

/// Client for the open product database. Picks one product, infers a
/// portion and scales the per-100g values to it.
pub struct CommunityDbClient {
    base_url: String,
    page_size: u32,
    transport: Arc<dyn HttpTransport>,
}

impl CommunityDbClient {
    pub fn new(config: &FoodConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: config.community_db_url.clone(),
            page_size: config.page_size,
            transport,
        }
    }

    pub async fn query(&self, query: &str) -> Option<ProviderQueryResult> {
        let request = HttpRequest::get(&self.base_url)
            .query("search_terms", query)
            .query("search_simple", "1")
            .query("json", "1")
            .query("page_size", self.page_size.to_string());

        let body = match self.transport.get_json(request).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Community database lookup failed for '{}': {}", query, e);
                return None;
            }
        };

        let products = body.get("products").and_then(|p| p.as_array())?;
        let product = select_candidate(products)?;
        let result = scale_product(query, product);
        if result.is_none() {
            debug!("Community database product for '{}' had no energy value", query);
        }
        result
    }
}

#[async_trait]
impl NutritionProvider for CommunityDbClient {
    fn provenance(&self) -> Provenance {
        Provenance::CommunityDb
    }

    async fn lookup(&self, query: &str) -> Option<ProviderQueryResult> {
        self.query(query).await
    }
}

fn nutrient(product: &Value, key: &str) -> Option<f64> {
    lenient_number(product.get("nutriments").and_then(|n| n.get(key)))
}

/// At least one recognised energy or macro field is present and non-zero.
pub fn has_usable_nutrients(product: &Value) -> bool {
    USABLE_NUTRIENT_KEYS
        .iter()
        .any(|key| nutrient(product, key).map_or(false, |v| v != 0.0))
}

/// First usable product; otherwise the first product, re-checked.
pub fn select_candidate(products: &[Value]) -> Option<&Value> {
    // The first-product retry cannot succeed once `find` has failed; it is kept so
    // selection stays compatible with the two-step lookup callers rely on.
    products
        .iter()
        .find(|p| has_usable_nutrients(p))
        .or_else(|| products.first())
        .filter(|p| has_usable_nutrients(p))
}

/// kcal per 100g, preferring the direct field and converting from kJ otherwise.
pub fn kcal_per_100g(product: &Value) -> Option<f64> {
    nutrient(product, "energy-kcal_100g")
        .filter(|kcal| *kcal > 0.0)
        .or_else(|| {
            nutrient(product, "energy_100g")
                .filter(|kj| *kj > 0.0)
                .map(|kj| (kj / KJ_PER_KCAL).round())
        })
}

/// Portion in grams, first rule that yields a positive amount wins.
pub fn infer_portion_grams(query: &str, product: &Value) -> (f64, PortionSource) {
    if let Some(grams) = parse_grams(query) {
        return (grams, PortionSource::Query);
    }
    if let Some(grams) = product
        .get("serving_size")
        .and_then(|s| s.as_str())
        .and_then(parse_grams)
    {
        return (grams, PortionSource::ServingSize);
    }
    if let Some(grams) = lenient_number(product.get("product_quantity")).filter(|g| *g > 0.0) {
        return (grams, PortionSource::ProductQuantity);
    }
    if let Some(grams) = product
        .get("quantity")
        .and_then(|q| q.as_str())
        .and_then(parse_package_grams)
    {
        return (grams, PortionSource::QuantityText);
    }
    (DEFAULT_PORTION_GRAMS, PortionSource::Default)
}

pub fn scale_product(query: &str, product: &Value) -> Option<ProviderQueryResult> {
    let kcal_100g = kcal_per_100g(product)?;
    let (grams, source) = infer_portion_grams(query, product);
    debug!("Portion {}g from {:?}", grams, source);

    let factor = grams / 100.0;
    let macro_of = |key: &str| round_to(nutrient(product, key).unwrap_or(0.0) * factor, 2);

    ProviderQueryResult::new(
        (kcal_100g * factor).round(),
        macro_of("proteins_100g"),
        macro_of("carbohydrates_100g"),
        macro_of("fat_100g"),
    )
}
