//! End-to-end tests driving the router in-process

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use rag_gateway::{
    config::GatewayConfig,
    providers::{CompletionProvider, CompletionRequest, ImageCompletionRequest},
    server::{state::AppState, GatewayServer},
    AugmentedAnswer, Citation, Error, InMemoryProvider, Result,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Counts calls before delegating to the wrapped provider
struct CountingProvider<P> {
    inner: P,
    calls: AtomicUsize,
}

impl<P> CountingProvider<P> {
    fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: CompletionProvider> CompletionProvider for CountingProvider<P> {
    async fn complete(&self, request: &CompletionRequest) -> Result<AugmentedAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.complete(request).await
    }

    async fn complete_with_image(&self, request: &ImageCompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.complete_with_image(request).await
    }

    async fn complete_follow_up(
        &self,
        image_url: &str,
        request: &CompletionRequest,
    ) -> Result<AugmentedAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.complete_follow_up(image_url, request).await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Fails every call with a fixed error kind
struct FailingProvider(fn() -> Error);

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(&self, _request: &CompletionRequest) -> Result<AugmentedAnswer> {
        Err((self.0)())
    }

    async fn complete_with_image(&self, _request: &ImageCompletionRequest) -> Result<String> {
        Err((self.0)())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn router(provider: Arc<dyn CompletionProvider>) -> Router {
    let state = AppState::with_provider(GatewayConfig::default(), provider);
    GatewayServer::with_state(state).build_router()
}

async fn post_json(router: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn empty_user_query_never_reaches_provider() {
    let provider = Arc::new(CountingProvider::new(InMemoryProvider::new()));
    let app = router(provider.clone());

    let (status, body) = post_json(
        app,
        "/api/v1/AzureOpenAI/chat",
        json!({ "userQuery": "" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User query is required");
    assert_eq!(body["details"][0], "UserQuery is required and cannot be empty");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn chat_returns_registered_answer_with_citations() {
    let provider = InMemoryProvider::new().with_augmented_response(
        "What is RAG?",
        AugmentedAnswer::new(
            "RAG response",
            vec![Citation::new("Test Source", "https://example.com/test")],
        ),
    );
    let app = router(Arc::new(provider));

    let (status, body) = post_json(
        app,
        "/api/v1/AzureOpenAI/chat",
        json!({ "userQuery": "What is RAG?", "useRAG": true, "temperature": 0.5 }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "RAG response");
    assert_eq!(body["citations"][0]["title"], "Test Source");
    assert_eq!(body["citations"][0]["url"], "https://example.com/test");
}

#[tokio::test]
async fn unversioned_route_is_served() {
    let app = router(Arc::new(InMemoryProvider::new()));

    let (status, body) = post_json(
        app,
        "/api/AzureOpenAI/chat",
        json!({ "userQuery": "hello" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "This is a simulated response to: hello");
}

#[tokio::test]
async fn image_flow_returns_both_phases() {
    let provider = InMemoryProvider::new().with_image_response(
        "https://example.com/image.jpg",
        "Image analysis result",
        AugmentedAnswer::uncited("Follow-up result"),
    );
    let provider = Arc::new(CountingProvider::new(provider));
    let app = router(provider.clone());

    let (status, body) = post_json(
        app,
        "/api/v1/AzureOpenAI/chat-with-image",
        json!({
            "imageUrl": "https://example.com/image.jpg",
            "initialImageQuery": "What landmark is this?",
            "followUpTemplate": "Tell me about {0}"
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imageResponse"], "Image analysis result");
    assert_eq!(body["followUpResponse"]["answer"], "Follow-up result");
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn invalid_image_url_is_rejected() {
    let provider = Arc::new(CountingProvider::new(InMemoryProvider::new()));
    let app = router(provider.clone());

    let (status, body) = post_json(
        app,
        "/api/v1/AzureOpenAI/chat-with-image",
        json!({ "imageUrl": "invalid-url" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid image URL format");
    assert_eq!(body["details"], json!(["ImageUrl must be a valid URL"]));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn malformed_json_is_a_validation_failure() {
    let app = router(Arc::new(InMemoryProvider::new()));

    let (status, body) =
        post_json(app, "/api/v1/AzureOpenAI/chat", "{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"].is_array());
}

#[tokio::test]
async fn provider_failures_map_to_status_codes() {
    let cases: [(fn() -> Error, StatusCode, &str); 4] = [
        (
            || Error::Unauthorized("bad key".into()),
            StatusCode::UNAUTHORIZED,
            "Unauthorized access.",
        ),
        (
            || Error::Timeout("slow".into()),
            StatusCode::REQUEST_TIMEOUT,
            "Request timeout. Please try again.",
        ),
        (
            || Error::invalid_argument("Content filtered"),
            StatusCode::BAD_REQUEST,
            "Content filtered",
        ),
        (
            || Error::provider("upstream detail"),
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred while processing your request.",
        ),
    ];

    for (make_error, expected_status, expected_message) in cases {
        let app = router(Arc::new(FailingProvider(make_error)));
        let (status, body) = post_json(
            app,
            "/api/v1/AzureOpenAI/chat",
            json!({ "userQuery": "hello" }).to_string(),
        )
        .await;

        assert_eq!(status, expected_status);
        assert_eq!(body["error"], expected_message);
        assert!(body.get("details").is_none());
    }
}

#[tokio::test]
async fn health_check_responds() {
    let app = router(Arc::new(InMemoryProvider::new()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}
