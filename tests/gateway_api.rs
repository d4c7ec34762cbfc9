use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use stay_concierge::config::prompt::AssistantPrompts;
use stay_concierge::llm::chat::{ChatProvider, ProviderError, ProviderTurn};
use stay_concierge::server::api::{build_router, AppState};

/// Replies with a fixed line and keeps every turn it was asked to complete.
struct CapturingProvider {
    reply: &'static str,
    seen: Arc<Mutex<Vec<ProviderTurn>>>,
}

impl CapturingProvider {
    fn new(reply: &'static str) -> (Arc<Self>, Arc<Mutex<Vec<ProviderTurn>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let provider = Arc::new(Self {
            reply,
            seen: seen.clone(),
        });
        (provider, seen)
    }
}

#[async_trait]
impl ChatProvider for CapturingProvider {
    async fn complete(&self, turns: &[ProviderTurn]) -> Result<String, ProviderError> {
        let mut seen = self.seen.lock().unwrap();
        seen.clear();
        seen.extend(turns.iter().cloned());
        Ok(self.reply.to_string())
    }
}

/// Produces a genuine transport error by dialing a closed local port.
struct UnreachableProvider;

#[async_trait]
impl ChatProvider for UnreachableProvider {
    async fn complete(&self, _turns: &[ProviderTurn]) -> Result<String, ProviderError> {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .expect_err("connecting to a closed port must fail");
        Err(ProviderError::Http(err))
    }
}

struct EmptyCompletionProvider;

#[async_trait]
impl ChatProvider for EmptyCompletionProvider {
    async fn complete(&self, _turns: &[ProviderTurn]) -> Result<String, ProviderError> {
        Err(ProviderError::EmptyCompletion)
    }
}

fn test_app(provider: Arc<dyn ChatProvider>) -> axum::Router {
    build_router(AppState {
        provider,
        prompts: Arc::new(AssistantPrompts::default()),
    })
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_route_reports_ok() {
    let (provider, _) = CapturingProvider::new("unused");
    let app = test_app(provider);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_chat_rejects_request_without_message_or_image() {
    let (provider, seen) = CapturingProvider::new("unused");
    let app = test_app(provider);

    let response = app.oneshot(chat_request(r#"{}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Message or image is required");
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_rejects_empty_message_and_empty_image() {
    let (provider, _) = CapturingProvider::new("unused");
    let app = test_app(provider);

    let response = app
        .oneshot(chat_request(r#"{"message":"","image":""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_returns_provider_reply() {
    let (provider, _) = CapturingProvider::new("We have two cabins free this weekend.");
    let app = test_app(provider);

    let response = app
        .oneshot(chat_request(r#"{"message":"any rooms left?"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "We have two cabins free this weekend.");
}

#[tokio::test]
async fn test_chat_sends_system_history_and_new_turn_in_order() {
    let (provider, seen) = CapturingProvider::new("ok");
    let app = test_app(provider);

    let body = r#"{
        "message": "and the cancellation policy?",
        "conversationHistory": [
            {"role": "user", "content": "do you allow pets?"},
            {"role": "assistant", "content": "Small dogs are welcome."}
        ]
    }"#;
    let response = app.oneshot(chat_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let turns = serde_json::to_value(&*seen.lock().unwrap()).unwrap();
    let turns = turns.as_array().unwrap();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0]["role"], "system");
    assert_eq!(
        turns[0]["content"],
        AssistantPrompts::default().system_prompt
    );
    assert_eq!(turns[1]["content"], "do you allow pets?");
    assert_eq!(turns[2]["role"], "assistant");
    assert_eq!(turns[3]["role"], "user");
    assert_eq!(turns[3]["content"], "and the cancellation policy?");
}

#[tokio::test]
async fn test_chat_accepts_full_message_objects_in_history() {
    let (provider, seen) = CapturingProvider::new("ok");
    let app = test_app(provider);

    // Clients may post whole transcript entries; extra fields are ignored.
    let body = r#"{
        "message": "next question",
        "conversationHistory": [
            {"id": "1", "role": "assistant", "content": "Hi!", "timestamp": 1721500000000, "image": "data:image/png;base64,AAAA"}
        ]
    }"#;
    let response = app.oneshot(chat_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let turns = serde_json::to_value(&*seen.lock().unwrap()).unwrap();
    assert_eq!(turns[1]["role"], "assistant");
    assert_eq!(turns[1]["content"], "Hi!");
}

#[tokio::test]
async fn test_chat_serves_fallback_when_provider_unreachable() {
    let app = test_app(Arc::new(UnreachableProvider));

    let response = app
        .oneshot(chat_request(r#"{"message":"hello?"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], AssistantPrompts::default().fallback_reply);
}

#[tokio::test]
async fn test_chat_serves_fallback_when_completion_is_empty() {
    let app = test_app(Arc::new(EmptyCompletionProvider));

    let response = app
        .oneshot(chat_request(r#"{"message":"hello?"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], AssistantPrompts::default().fallback_reply);
}

#[tokio::test]
async fn test_chat_with_image_only_asks_the_stock_question() {
    let (provider, seen) = CapturingProvider::new("That looks like a lake view.");
    let app = test_app(provider);

    let response = app
        .oneshot(chat_request(
            r#"{"image":"data:image/png;base64,AAAA"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let turns = serde_json::to_value(&*seen.lock().unwrap()).unwrap();
    let parts = turns[1]["content"].as_array().unwrap();
    assert_eq!(parts[0]["type"], "text");
    assert_eq!(parts[0]["text"], "What do you see in this image?");
    assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,AAAA");
}
