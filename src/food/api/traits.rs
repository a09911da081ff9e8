use async_trait::async_trait;

use crate::food::types::{Provenance, ProviderQueryResult};

/// A remote nutrition source. `None` covers every kind of "no usable data":
/// unconfigured, unreachable, malformed or empty.
#[async_trait]
pub trait NutritionProvider: Send + Sync {
    fn provenance(&self) -> Provenance;

    async fn lookup(&self, query: &str) -> Option<ProviderQueryResult>;
}
