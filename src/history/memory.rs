use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use crate::history::{ HistoryError, HistoryStore };
use crate::models::chat::ChatMessage;

/// Process-local conversation log. Grows for the life of the process.
#[derive(Default)]
pub struct MemoryHistoryStore {
    conversations: RwLock<HashMap<String, Vec<ChatMessage>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn add_message(
        &self,
        conversation_id: &str,
        message: ChatMessage
    ) -> Result<(), HistoryError> {
        let mut conversations = self.conversations.write().await;
        conversations.entry(conversation_id.to_string()).or_default().push(message);
        Ok(())
    }

    async fn record_exchange(
        &self,
        conversation_id: &str,
        user: ChatMessage,
        assistant: ChatMessage
    ) -> Result<(), HistoryError> {
        let mut conversations = self.conversations.write().await;
        let messages = conversations.entry(conversation_id.to_string()).or_default();
        messages.push(user);
        messages.push(assistant);
        Ok(())
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, HistoryError> {
        let conversations = self.conversations.read().await;
        Ok(conversations.get(conversation_id).cloned().unwrap_or_default())
    }

    async fn conversation_count(&self) -> Result<usize, HistoryError> {
        Ok(self.conversations.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;
    use std::sync::Arc;

    #[tokio::test]
    async fn unknown_conversation_is_empty() {
        let store = MemoryHistoryStore::new();
        assert!(store.get_conversation("nope").await.unwrap().is_empty());
        assert_eq!(store.conversation_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn appends_keep_insertion_order() {
        let store = MemoryHistoryStore::new();
        store.add_message("c1", ChatMessage::user("one")).await.unwrap();
        store.add_message("c1", ChatMessage::assistant("two")).await.unwrap();
        store.add_message("c2", ChatMessage::user("other")).await.unwrap();

        let c1 = store.get_conversation("c1").await.unwrap();
        let contents: Vec<_> = c1.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two"]);
        assert_eq!(store.conversation_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn empty_id_is_an_ordinary_key() {
        let store = MemoryHistoryStore::new();
        store
            .record_exchange("", ChatMessage::user("q"), ChatMessage::assistant("a")).await
            .unwrap();
        assert_eq!(store.get_conversation("").await.unwrap().len(), 2);
        assert!(store.get_conversation(" ").await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_exchanges_never_split_pairs() {
        let store = Arc::new(MemoryHistoryStore::new());
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = Arc::clone(&store);
            handles.push(
                tokio::spawn(async move {
                    store
                        .record_exchange(
                            "shared",
                            ChatMessage::user(format!("q{}", i)),
                            ChatMessage::assistant(format!("a{}", i))
                        ).await
                        .unwrap();
                })
            );
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let messages = store.get_conversation("shared").await.unwrap();
        assert_eq!(messages.len(), 128);
        for pair in messages.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
            assert_eq!(pair[0].content[1..], pair[1].content[1..]);
        }
    }
}
