use serde::{ Serialize, Deserialize };
use super::chat::ChatMessage;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_id: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub conversation_id: String,
    pub timestamp: String,
}

#[derive(Serialize, Debug)]
pub struct ConversationResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
