use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use log::error;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::config::prompt::AssistantPrompts;
use crate::llm::chat::{ChatProvider, ProviderError, ProviderTurn, TurnRole};
use crate::models::chat::{ChatResponse, ErrorResponse, GatewayChatRequest, HISTORY_WINDOW};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
    pub prompts: Arc<AssistantPrompts>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

/// One request, one reply. Requests that carry neither text nor an image
/// are the caller's mistake and get a 400; everything that goes wrong
/// after that point is ours and turns into the canned fallback reply so
/// the conversation never dead-ends on the client.
async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<GatewayChatRequest>,
) -> impl IntoResponse {
    if req.message.is_empty() && req.image.as_deref().map_or(true, str::is_empty) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Message or image is required".to_string(),
            }),
        )
            .into_response();
    }

    let turns = assemble_turns(&state.prompts, &req);

    match state.provider.complete(&turns).await {
        Ok(reply) => (StatusCode::OK, Json(ChatResponse { message: reply })).into_response(),
        Err(ProviderError::Http(e)) => {
            error!("Provider request failed, serving fallback reply: {}", e);
            fallback_response(&state.prompts)
        }
        Err(ProviderError::EmptyCompletion) => {
            error!("Provider returned an empty completion, serving fallback reply");
            fallback_response(&state.prompts)
        }
    }
}

fn fallback_response(prompts: &AssistantPrompts) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(ChatResponse {
            message: prompts.fallback_reply.clone(),
        }),
    )
        .into_response()
}

/// Builds the upstream conversation: system prompt first, then the most
/// recent window of history in original order, then the new user turn.
/// An attached image turns the new turn into tagged parts, with a stock
/// question standing in when the user sent the image without a caption.
fn assemble_turns(prompts: &AssistantPrompts, req: &GatewayChatRequest) -> Vec<ProviderTurn> {
    let mut turns = Vec::with_capacity(req.conversation_history.len() + 2);
    turns.push(ProviderTurn::system(&prompts.system_prompt));

    let skip = req.conversation_history.len().saturating_sub(HISTORY_WINDOW);
    for entry in req.conversation_history.iter().skip(skip) {
        turns.push(ProviderTurn::text(TurnRole::from(entry.role), &entry.content));
    }

    let image = req.image.as_deref().filter(|url| !url.is_empty());
    match image {
        Some(url) => {
            let text = if req.message.is_empty() {
                &prompts.image_prompt
            } else {
                &req.message
            };
            turns.push(ProviderTurn::user_with_image(text, url));
        }
        None => turns.push(ProviderTurn::text(TurnRole::User, &req.message)),
    }

    turns
}
