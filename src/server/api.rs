use crate::agent::ChatAgent;
use crate::models::api::{ ChatRequest, ChatResponse, ConversationResponse, HealthResponse };
use crate::models::chat::now_iso;
use crate::server::error::{ ApiError, ApiResult };
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ State, Path, rejection::JsonRejection },
};
use tower_http::cors::{ Any, CorsLayer };
use log::debug;

#[derive(Clone)]
pub struct AppState {
    pub agent: ChatAgent,
    pub expose_internal_errors: bool,
}

impl AppState {
    pub fn new(agent: ChatAgent, expose_internal_errors: bool) -> Self {
        Self { agent, expose_internal_errors }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/conversation/{conversation_id}", get(conversation_handler))
        .route("/api/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>
) -> ApiResult<Json<ChatResponse>> {
    let Json(req) = payload.map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;
    debug!("Chat request for conversation '{}'", req.conversation_id);

    let reply = state.agent
        .process_message(&req.conversation_id, &req.message).await
        .map_err(|e| ApiError::from_agent(e, state.expose_internal_errors))?;

    Ok(
        Json(ChatResponse {
            reply: reply.reply,
            conversation_id: reply.conversation_id,
            timestamp: reply.timestamp,
        })
    )
}

async fn conversation_handler(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>
) -> ApiResult<Json<ConversationResponse>> {
    let messages = state.agent
        .conversation(&conversation_id).await
        .map_err(|e| ApiError::from_agent(e, state.expose_internal_errors))?;
    Ok(Json(ConversationResponse { messages }))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: now_iso(),
    })
}
