mod memory;

pub use memory::MemoryHistoryStore;

use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use thiserror::Error as ThisError;
use crate::cli::Args;
use crate::models::chat::ChatMessage;

#[derive(Debug, ThisError)]
pub enum HistoryError {
    #[error("Unsupported history store type: {0}")]
    Unsupported(String),
    /// Fault reported by a store backend while serving a request.
    #[error("history backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn add_message(
        &self,
        conversation_id: &str,
        message: ChatMessage
    ) -> Result<(), HistoryError>;

    /// Appends a user message and its reply as one unit.
    ///
    /// The default falls back to two separate appends; backends that can
    /// hold a lock or transaction across both should override it.
    async fn record_exchange(
        &self,
        conversation_id: &str,
        user: ChatMessage,
        assistant: ChatMessage
    ) -> Result<(), HistoryError> {
        self.add_message(conversation_id, user).await?;
        self.add_message(conversation_id, assistant).await
    }

    /// Unknown ids yield an empty list, never an error.
    async fn get_conversation(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, HistoryError>;

    async fn conversation_count(&self) -> Result<usize, HistoryError>;
}

pub fn create_history_store(args: &Args) -> Result<Arc<dyn HistoryStore>, HistoryError> {
    match args.history_type.to_lowercase().as_str() {
        "memory" => Ok(Arc::new(MemoryHistoryStore::new())),
        _ => Err(HistoryError::Unsupported(args.history_type.clone())),
    }
}

pub fn initialize_history_store(args: &Args) -> Result<Arc<dyn HistoryStore>, HistoryError> {
    info!("Chat history will be stored in: {}", args.history_type);
    create_history_store(args)
}
