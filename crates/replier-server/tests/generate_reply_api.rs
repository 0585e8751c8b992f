// tests/generate_reply_api.rs
// HTTP contract tests for /generate-reply and /health with a mocked generator

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use replier::web::{create_router, state::AppState};
use replier::{ReplierError, generator::ReplyGenerator};
use replier_types::{GenerateRequest, Tone};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Answers every request with a short tone-tagged reply
#[derive(Default)]
struct CannedGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl ReplyGenerator for CannedGenerator {
    async fn generate_reply(&self, request: &GenerateRequest) -> replier::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Congrats! ({})", request.response_type))
    }
}

/// Fails like a provider rejecting the API key
struct FailingGenerator;

#[async_trait]
impl ReplyGenerator for FailingGenerator {
    async fn generate_reply(&self, _request: &GenerateRequest) -> replier::Result<String> {
        Err(ReplierError::Provider {
            status: 401,
            body: "invalid x-api-key sk-ant-leaked-detail".to_string(),
        })
    }
}

fn app_with(generator: Arc<dyn ReplyGenerator>) -> axum::Router {
    create_router(AppState::new(generator))
}

async fn post_json(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/generate-reply")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_raw(
    app: axum::Router,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method("POST").uri("/generate-reply");
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }

    let response = app
        .oneshot(request.body(Body::from(body)).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================================
// Success path
// ============================================================================

#[tokio::test]
async fn test_every_tone_returns_reply() {
    let generator = Arc::new(CannedGenerator::default());
    let app = app_with(generator.clone());

    for tone in Tone::ALL {
        let (status, body) = post_json(
            app.clone(),
            json!({"selectedText": "I just shipped a new feature!", "responseType": tone.as_str()}),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "tone {tone}");
        let reply = body["reply"].as_str().unwrap();
        assert!(!reply.is_empty());
        assert!(reply.contains(tone.as_str()));
    }

    assert_eq!(generator.calls.load(Ordering::SeqCst), Tone::ALL.len());
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_selected_text_validation() {
    let generator = Arc::new(CannedGenerator::default());
    let app = app_with(generator.clone());

    for body in [
        json!({"responseType": "cheerleader"}),
        json!({"selectedText": "", "responseType": "cheerleader"}),
        json!({"selectedText": ["a"], "responseType": "cheerleader"}),
    ] {
        let (status, body) = post_json(app.clone(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("selectedText"));
    }

    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_json_body_fails_selected_text_check() {
    let generator = Arc::new(CannedGenerator::default());
    let app = app_with(generator.clone());
    let valid = r#"{"selectedText": "hello", "responseType": "cheerleader"}"#;

    for (content_type, body) in [
        (None, ""),
        (Some("application/json"), ""),
        (Some("text/plain"), valid),
        (None, valid),
        (Some("application/json"), "{bad"),
    ] {
        let (status, body) = post_raw(app.clone(), content_type, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{content_type:?}");
        assert_eq!(
            body,
            json!({"error": "selectedText is required and must be a string"})
        );
    }

    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_response_type_validation_lists_valid_values() {
    let generator = Arc::new(CannedGenerator::default());
    let app = app_with(generator.clone());

    for body in [
        json!({"selectedText": "hello"}),
        json!({"selectedText": "hello", "responseType": "sarcastic"}),
    ] {
        let (status, body) = post_json(app.clone(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = body["error"].as_str().unwrap();
        for tone in Tone::ALL {
            assert!(error.contains(tone.as_str()));
        }
    }

    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Upstream failure
// ============================================================================

#[tokio::test]
async fn test_generator_failure_is_opaque() {
    let app = app_with(Arc::new(FailingGenerator));

    let (status, body) = post_json(
        app,
        json!({"selectedText": "hello", "responseType": "networker"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to generate reply"}));
    assert!(!body.to_string().contains("leaked-detail"));
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_ignores_provider_state() {
    let app = app_with(Arc::new(FailingGenerator));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let app = app_with(Arc::new(CannedGenerator::default()));

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/generate-reply")
                .header("origin", "https://www.linkedin.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("access-control-allow-origin"));
}
