use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::food::api::transport::{HttpRequest, HttpTransport};
use crate::food::api::NutritionProvider;
use crate::food::error::NutritionError;
use crate::food::types::{Provenance, ProviderQueryResult};

/// Transport that replays one canned outcome and records every request.
pub struct FakeTransport {
    outcome: Result<Value, String>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn ok(body: Value) -> Self {
        Self {
            outcome: Ok(body),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn err(error: NutritionError) -> Self {
        Self {
            outcome: Err(error.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get_json(&self, request: HttpRequest) -> Result<Value, NutritionError> {
        self.requests.lock().unwrap().push(request);
        self.outcome.clone().map_err(NutritionError::Transport)
    }
}

/// Provider returning a fixed answer and counting lookups.
pub struct StaticProvider {
    provenance: Provenance,
    result: Option<ProviderQueryResult>,
    calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new(provenance: Provenance, result: Option<ProviderQueryResult>) -> Self {
        Self {
            provenance,
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn kcal(provenance: Provenance, kcal: f64) -> Self {
        Self::new(provenance, ProviderQueryResult::new(kcal, 1.0, 2.0, 3.0))
    }

    pub fn absent(provenance: Provenance) -> Self {
        Self::new(provenance, None)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NutritionProvider for StaticProvider {
    fn provenance(&self) -> Provenance {
        self.provenance
    }

    async fn lookup(&self, _query: &str) -> Option<ProviderQueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
    }
}
