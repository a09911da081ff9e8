use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{Response as HttpResponse, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use validator::Validate;

use crate::food::analysis::local::estimate_locally;
use crate::food::analysis::nutrition::NutritionEstimator;

pub const MAX_QUERY_LENGTH: u64 = 500;

#[derive(Clone)]
pub struct AppState {
    estimator: Arc<NutritionEstimator>,
}

#[derive(Debug, Deserialize)]
pub struct NutritionParams {
    #[serde(alias = "query")]
    q: Option<String>,
    fallback: Option<String>,
}

#[derive(Validate)]
struct FoodQuery {
    #[validate(length(min = 1, max = "MAX_QUERY_LENGTH"))]
    text: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct ApiResponse {
    status: String,
}

fn client_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: message.to_string() }),
    )
        .into_response()
}

/// The trimmed, validated food description, or the 400 response to send back.
fn validated_query(params: &NutritionParams) -> Result<&str, Response> {
    let raw = params
        .q
        .as_deref()
        .ok_or_else(|| client_error("Missing query parameter 'q'"))?;

    let text = raw.trim();
    FoodQuery { text: text.to_string() }.validate().map_err(|_| {
        if text.is_empty() {
            client_error("Query parameter 'q' must not be empty")
        } else {
            client_error(&format!("Query must be at most {} characters", MAX_QUERY_LENGTH))
        }
    })?;
    Ok(text)
}

/// Create and configure the API router
pub fn create_api(estimator: NutritionEstimator, max_concurrent_requests: usize) -> Router {
    let state = AppState {
        estimator: Arc::new(estimator),
    };

    let routes = Router::new()
        .route("/nutrition", get(nutrition_handler))
        .route("/nutrition/local", get(local_handler))
        .route("/health", get(health_check));

    with_middleware(routes, max_concurrent_requests).with_state(state)
}

/// Concurrency limit, then panic recovery, with CORS outermost so every
/// response (including the 500 from a caught panic) carries CORS headers.
fn with_middleware<S>(router: Router<S>, max_concurrent_requests: usize) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin)
        .max_age(std::time::Duration::from_secs(3600));

    router
        .layer(ConcurrencyLimitLayer::new(max_concurrent_requests))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}

async fn nutrition_handler(
    State(state): State<AppState>,
    params: Result<Query<NutritionParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return client_error(&rejection.body_text()),
    };
    let query = match validated_query(&params) {
        Ok(query) => query,
        Err(response) => return response,
    };

    let use_local_fallback = params.fallback.as_deref() == Some("local");
    info!("Nutrition lookup for '{}' (local fallback: {})", query, use_local_fallback);

    let estimate = if use_local_fallback {
        state.estimator.estimate_with_local_fallback(query).await
    } else {
        state.estimator.estimate(query).await
    };

    Json(estimate).into_response()
}

async fn local_handler(params: Result<Query<NutritionParams>, QueryRejection>) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return client_error(&rejection.body_text()),
    };
    match validated_query(&params) {
        Ok(query) => Json(estimate_locally(query)).into_response(),
        Err(response) => response,
    }
}

async fn health_check() -> Response {
    Json(ApiResponse {
        status: "Server is running and healthy".to_string(),
    })
    .into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> HttpResponse<Body> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Request handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error".to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::api::testing::StaticProvider;
    use crate::food::api::NutritionProvider;
    use crate::food::types::Provenance;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router(exact: &Arc<StaticProvider>, community: &Arc<StaticProvider>) -> Router {
        let providers: Vec<Arc<dyn NutritionProvider>> = vec![exact.clone(), community.clone()];
        create_api(NutritionEstimator::new(providers), 8)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_query_is_client_error() {
        let exact = Arc::new(StaticProvider::kcal(Provenance::ExactMatchApi, 100.0));
        let community = Arc::new(StaticProvider::kcal(Provenance::CommunityDb, 100.0));

        let (status, body) = get_json(router(&exact, &community), "/nutrition").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Missing"));
        assert_eq!(exact.calls() + community.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_query_is_client_error_without_provider_calls() {
        let exact = Arc::new(StaticProvider::kcal(Provenance::ExactMatchApi, 100.0));
        let community = Arc::new(StaticProvider::kcal(Provenance::CommunityDb, 100.0));

        for uri in ["/nutrition?q=", "/nutrition?q=%20%20", "/nutrition/local?q="] {
            let (status, body) = get_json(router(&exact, &community), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert!(body["error"].is_string());
        }
        assert_eq!(exact.calls() + community.calls(), 0);
    }

    #[tokio::test]
    async fn test_overlong_query_rejected() {
        let exact = Arc::new(StaticProvider::kcal(Provenance::ExactMatchApi, 100.0));
        let community = Arc::new(StaticProvider::absent(Provenance::CommunityDb));
        let uri = format!("/nutrition?q={}", "a".repeat(501));

        let (status, body) = get_json(router(&exact, &community), &uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("at most"));
        assert_eq!(exact.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_query_string_is_json_client_error() {
        let exact = Arc::new(StaticProvider::kcal(Provenance::ExactMatchApi, 100.0));
        let community = Arc::new(StaticProvider::kcal(Provenance::CommunityDb, 100.0));

        for uri in ["/nutrition?q=apple&query=pear", "/nutrition/local?q=apple&query=pear"] {
            let (status, body) = get_json(router(&exact, &community), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert!(!body["error"].as_str().unwrap().is_empty());
        }
        assert_eq!(exact.calls() + community.calls(), 0);
    }

    #[tokio::test]
    async fn test_query_at_length_limit_is_accepted() {
        let exact = Arc::new(StaticProvider::kcal(Provenance::ExactMatchApi, 100.0));
        let community = Arc::new(StaticProvider::absent(Provenance::CommunityDb));
        let uri = format!("/nutrition?q={}", "a".repeat(MAX_QUERY_LENGTH as usize));

        let (status, body) = get_json(router(&exact, &community), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "exact-match-api");
    }

    #[tokio::test]
    async fn test_estimate_response_shape() {
        let exact = Arc::new(StaticProvider::kcal(Provenance::ExactMatchApi, 150.0));
        let community = Arc::new(StaticProvider::kcal(Provenance::CommunityDb, 330.0));

        let (status, body) = get_json(router(&exact, &community), "/nutrition?q=egg%20toast").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kcal"], 150.0);
        assert_eq!(body["protein_g"], 1.0);
        assert_eq!(body["carbs_g"], 2.0);
        assert_eq!(body["fat_g"], 3.0);
        assert_eq!(body["source"], "exact-match-api");
        assert_eq!(body["query"], "egg toast");
        assert_eq!(community.calls(), 0);
    }

    #[tokio::test]
    async fn test_none_result_and_local_fallback() {
        let exact = Arc::new(StaticProvider::absent(Provenance::ExactMatchApi));
        let community = Arc::new(StaticProvider::absent(Provenance::CommunityDb));

        let (status, body) = get_json(router(&exact, &community), "/nutrition?query=banana").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "none");
        assert_eq!(body["kcal"], 0.0);

        let (_, body) = get_json(router(&exact, &community), "/nutrition?q=banana&fallback=local").await;
        assert_eq!(body["source"], "local-table");
        assert_eq!(body["kcal"], 105.0);
    }

    #[tokio::test]
    async fn test_local_endpoint_never_calls_providers() {
        let exact = Arc::new(StaticProvider::kcal(Provenance::ExactMatchApi, 100.0));
        let community = Arc::new(StaticProvider::kcal(Provenance::CommunityDb, 100.0));

        let (status, body) = get_json(router(&exact, &community), "/nutrition/local?q=lentil%20soup").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "local-generic");
        assert_eq!(exact.calls() + community.calls(), 0);
    }

    #[tokio::test]
    async fn test_health() {
        let exact = Arc::new(StaticProvider::absent(Provenance::ExactMatchApi));
        let community = Arc::new(StaticProvider::absent(Provenance::CommunityDb));
        let (status, body) = get_json(router(&exact, &community), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["status"].as_str().unwrap().contains("healthy"));
    }

    async fn boom() -> &'static str {
        panic!("kaboom")
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let app: Router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));

        let (status, body) = get_json(app, "/boom").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_panic_response_carries_cors_headers() {
        let app: Router = with_middleware(Router::new().route("/boom", get(boom)), 8);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/boom")
                    .header("origin", "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
