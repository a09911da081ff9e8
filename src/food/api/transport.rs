use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::food::config::FoodConfig;
use crate::food::error::NutritionError;

/// A single outbound GET against a JSON endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: &str) -> Self {
        Self {
            url: url.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get_json(&self, request: HttpRequest) -> Result<Value, NutritionError>;
}

/// reqwest-backed transport. Sets the client identifier and per-call timeout once.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &FoodConfig) -> Result<Self, NutritionError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| NutritionError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, request: HttpRequest) -> Result<Value, NutritionError> {
        let mut builder = self.client.get(&request.url).query(&request.query);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NutritionError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| NutritionError::Parse(e.to_string()))
    }
}
