//! Shared test harness: app construction with stub AI providers and
//! request/response helpers for driving the router via `oneshot`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use planner_ai::provider::ProviderError;
use planner_ai::{CompletionProvider, Orchestrator};
use planner_api::auth::jwt::JwtConfig;
use planner_api::config::{ServerConfig, UploadConfig};
use planner_api::routes;
use planner_api::state::AppState;
use planner_core::planning::ProviderKind;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            token_expiry_days: 7,
        },
        upload: UploadConfig {
            dir: std::env::temp_dir().join("planner-test-uploads"),
            max_file_size: 10 * 1024 * 1024,
        },
    }
}

// ---------------------------------------------------------------------------
// Stub AI providers
// ---------------------------------------------------------------------------

/// A [`CompletionProvider`] that records calls and replies with a canned
/// result, standing in for a vendor client.
pub struct StubProvider {
    kind: ProviderKind,
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn replying(kind: ProviderKind, reply: &str) -> Arc<Self> {
        Arc::new(Self {
            kind,
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(kind: ProviderKind, message: &str) -> Arc<Self> {
        Arc::new(Self {
            kind,
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(ProviderError::Api {
                provider: self.kind,
                status: 500,
                body: message.clone(),
            }),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.complete("").await.map(|_| ())
    }
}

/// A stub reply that satisfies the planning schema with `count` questions.
pub fn valid_planning_reply(count: usize) -> String {
    let questions: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "questionText": format!("Question {}", i + 1),
                "difficulty": if i % 2 == 0 { "easy" } else { "medium" },
                "estimatedTime": 5,
                "expectedAnswer": "A short answer."
            })
        })
        .collect();
    serde_json::json!({
        "weeklyAbstract": "This week covers recursion and sorting.",
        "learningObjectives": ["Understand recursion", "Apply sorting"],
        "questions": questions,
        "assessmentMethods": [
            {"methodName": "Quick Quiz", "description": "Short quiz.", "duration": 10}
        ],
        "additionalNotes": "Bring laptops."
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router with all middleware layers, a stub
/// OpenAI provider returning a valid 5-question payload, and the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let orchestrator = Orchestrator::new(ProviderKind::Openai).with_provider(
        StubProvider::replying(ProviderKind::Openai, &valid_planning_reply(5)),
    );
    build_test_app_with(pool, orchestrator)
}

/// Build the application router around a custom orchestrator (used to plug
/// in failing or recording stubs).
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app_with(pool: PgPool, orchestrator: Orchestrator) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
        orchestrator: Arc::new(orchestrator),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:3000".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should not fail")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register a user via the API and return `(user_id, token)`.
pub async fn register_user(app: Router, email: &str, student_id: &str) -> (i64, String) {
    let body = serde_json::json!({
        "email": email,
        "password": "correct-horse",
        "first_name": "Sam",
        "last_name": "Okafor",
        "student_id": student_id,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["user"]["id"].as_i64().expect("user id should be set"),
        json["token"].as_str().expect("token should be set").to_string(),
    )
}

/// Create a course via the API and return its id.
pub async fn create_course(app: Router, token: &str, code: &str) -> i64 {
    let body = serde_json::json!({
        "course_code": code,
        "course_name": "Introduction to Computer Science",
        "semester": "Fall",
        "year": 2025,
    });
    let response = post_json_auth(app, "/api/v1/courses", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"]
        .as_i64()
        .expect("course id should be set")
}
