//! # API REST
//!
//! REST API implementation for MediQuery.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, status mapping, CORS)
//!
//! Uses `api-shared` for wire types and `mediquery-core` for the analysis itself.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    AnalysisResponse, AnalyzeSymptomsReq, ErrorRes, HealthRes, HealthService, SymptomAnalysis,
    TestEnvRes, ANALYSIS_FAILED_MESSAGE, ANALYZE_SYMPTOMS_PATH, NO_SYMPTOMS_MESSAGE,
    TEST_ENV_PATH,
};
use mediquery_core::{ConfigResult, CoreConfig, SymptomService};

/// Default listen address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Application state shared across REST API handlers
///
/// Holds the analysis service. The service owns its configuration and upstream client behind
/// `Arc`s, so cloning the state per request is cheap.
#[derive(Clone, Debug)]
pub struct AppState {
    service: SymptomService,
}

impl AppState {
    pub fn new(service: SymptomService) -> Self {
        Self { service }
    }

    /// State backed by the real upstream client.
    pub fn from_config(cfg: Arc<CoreConfig>) -> ConfigResult<Self> {
        Ok(Self::new(SymptomService::from_config(cfg)?))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, analyze_symptoms, test_env),
    components(schemas(
        HealthRes,
        AnalyzeSymptomsReq,
        AnalysisResponse,
        SymptomAnalysis,
        ErrorRes,
        TestEnvRes,
    ))
)]
pub struct ApiDoc;

/// Build the application router with all routes, Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(ANALYZE_SYMPTOMS_PATH, post(analyze_symptoms))
        .route(TEST_ENV_PATH, get(test_env))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolve core configuration from process environment variables.
///
/// # Environment Variables
/// - `GROQ_API_KEY`: bearer credential for the completion service (optional)
/// - `MEDIQUERY_UPSTREAM_URL`: chat-completion endpoint
/// - `MEDIQUERY_MODEL`: model name
/// - `MEDIQUERY_TEMPERATURE`: sampling temperature, `0..=2`
/// - `MEDIQUERY_UPSTREAM_TIMEOUT_SECS`: optional request timeout
///
/// # Errors
/// Returns a `ConfigError` if any value is present but invalid.
pub fn config_from_env() -> ConfigResult<CoreConfig> {
    CoreConfig::from_env_values(
        std::env::var("GROQ_API_KEY").ok(),
        std::env::var("MEDIQUERY_UPSTREAM_URL").ok(),
        std::env::var("MEDIQUERY_MODEL").ok(),
        std::env::var("MEDIQUERY_TEMPERATURE").ok(),
        std::env::var("MEDIQUERY_UPSTREAM_TIMEOUT_SECS").ok(),
    )
}

type ApiError = (StatusCode, Json<ErrorRes>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorRes {
            error: message.to_string(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/analyze-symptoms",
    request_body = AnalyzeSymptomsReq,
    responses(
        (status = 200, description = "Structured guidance with a human-readable rendering", body = AnalysisResponse),
        (status = 400, description = "No symptoms provided", body = ErrorRes),
        (status = 500, description = "The completion service could not be reached", body = ErrorRes)
    )
)]
/// Analyse a free-text symptom description
///
/// # Errors
///
/// Returns `400 Bad Request` if:
/// - the body is not valid JSON, or
/// - `symptoms` is missing, empty or whitespace.
///
/// Returns `500 Internal Server Error` if the completion service fails. The cause is logged and
/// never returned to the caller.
#[axum::debug_handler]
async fn analyze_symptoms(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeSymptomsReq>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!("Rejected analyze request body: {}", rejection);
        api_error(StatusCode::BAD_REQUEST, NO_SYMPTOMS_MESSAGE)
    })?;

    let symptoms = req.symptoms.unwrap_or_default();
    match state.service.analyze(&symptoms).await {
        Ok(response) => Ok(Json(response)),
        Err(e) if e.is_client_error() => Err(api_error(StatusCode::BAD_REQUEST, NO_SYMPTOMS_MESSAGE)),
        Err(e) => {
            tracing::error!("Analyze symptoms error: {:?}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ANALYSIS_FAILED_MESSAGE,
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/test-env",
    responses(
        (status = 200, description = "Whether the completion credential is configured", body = TestEnvRes)
    )
)]
/// Report whether the completion credential is present. Never echoes its value.
#[axum::debug_handler]
async fn test_env(State(state): State<AppState>) -> Json<TestEnvRes> {
    Json(TestEnvRes {
        groq_api_key_configured: state.service.config().has_api_key(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use mediquery_core::upstream::ChatCompletionRequest;
    use mediquery_core::{CompletionClient, ServiceError, ServiceResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    const VALID_JSON: &str = r#"{
        "explanation": "A sore throat with mild fever is often caused by a viral infection.",
        "possibleCauses": ["Common cold", "Viral pharyngitis"],
        "homeRemedies": ["Rest", "Warm fluids"],
        "whenToSeeDoctor": ["Fever lasts more than three days"],
        "urgentWarnings": ["Difficulty breathing"]
    }"#;

    struct CannedClient {
        reply: Result<String, u16>,
        calls: AtomicUsize,
    }

    impl CannedClient {
        fn new(reply: Result<String, u16>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl CompletionClient for CannedClient {
        async fn complete(&self, _request: &ChatCompletionRequest) -> ServiceResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(ServiceError::UpstreamStatus {
                    status: *status,
                    body: "upstream unavailable".into(),
                }),
            }
        }
    }

    fn app(client: Arc<CannedClient>, api_key: Option<&str>) -> Router {
        let cfg = Arc::new(CoreConfig::with_api_key(api_key.map(str::to_string)).unwrap());
        router(AppState::new(SymptomService::new(cfg, client)))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(ANALYZE_SYMPTOMS_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_alive() {
        let response = app(CannedClient::new(Ok(String::new())), None)
            .oneshot(get("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["message"], "MediQuery is alive");
    }

    #[tokio::test]
    async fn analyze_returns_fields_and_human_readable() {
        let client = CannedClient::new(Ok(VALID_JSON.to_string()));
        let response = app(client.clone(), Some("key"))
            .oneshot(post_json(
                r#"{"symptoms":"sore throat and mild fever for two days"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["possibleCauses"][0], "Common cold");
        assert_eq!(body["urgentWarnings"][0], "Difficulty breathing");
        let text = body["humanReadable"].as_str().unwrap();
        assert!(text.starts_with("Understanding Your Symptoms:"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_and_missing_symptoms_are_rejected_without_upstream_call() {
        let client = CannedClient::new(Ok(VALID_JSON.to_string()));
        for body in [r#"{"symptoms":""}"#, r#"{"symptoms":"   "}"#, "{}"] {
            let response = app(client.clone(), None)
                .oneshot(post_json(body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(body_json(response).await["error"], NO_SYMPTOMS_MESSAGE);
        }
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let response = app(CannedClient::new(Ok(VALID_JSON.to_string())), None)
            .oneshot(post_json("{\"symptoms\":"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], NO_SYMPTOMS_MESSAGE);
    }

    #[tokio::test]
    async fn upstream_failure_is_generic_server_error() {
        let response = app(CannedClient::new(Err(503)), Some("key"))
            .oneshot(post_json(r#"{"symptoms":"headache"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], ANALYSIS_FAILED_MESSAGE);
        assert!(!body.to_string().contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn unparseable_content_still_succeeds_with_fallback() {
        let response = app(CannedClient::new(Ok("not json at all".into())), None)
            .oneshot(post_json(r#"{"symptoms":"headache"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["explanation"]
            .as_str()
            .unwrap()
            .contains("\"headache\""));
        assert_eq!(body["urgentWarnings"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_env_reports_presence_only() {
        let response = app(CannedClient::new(Ok(String::new())), Some("super-secret"))
            .oneshot(get(TEST_ENV_PATH))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["groqApiKeyConfigured"], true);
        assert!(!body.to_string().contains("super-secret"));

        let response = app(CannedClient::new(Ok(String::new())), None)
            .oneshot(get(TEST_ENV_PATH))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["groqApiKeyConfigured"], false);
    }

    #[tokio::test]
    async fn swagger_ui_and_openapi_document_are_served() {
        let app = app(CannedClient::new(Ok(String::new())), None);

        let response = app.clone().oneshot(get("/swagger-ui/")).await.unwrap();
        assert_ne!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"].get(ANALYZE_SYMPTOMS_PATH).is_some());
    }

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/health", ANALYZE_SYMPTOMS_PATH, TEST_ENV_PATH] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
