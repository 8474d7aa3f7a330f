use crate::config::rules;
use crate::history::{ initialize_history_store, HistoryError, HistoryStore };
use crate::responder::KeywordResponder;
use crate::cli::Args;
use crate::models::chat::{ now_iso, ChatMessage };

use log::{ info, debug, warn, log_enabled, Level };
use std::error::Error;
use std::sync::Arc;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AgentError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error(transparent)]
    Store(#[from] HistoryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
    pub conversation_id: String,
    pub timestamp: String,
}

#[derive(Clone)]
pub struct ChatAgent {
    responder: Arc<KeywordResponder>,
    history_store: Arc<dyn HistoryStore>,
}

impl ChatAgent {
    pub fn new(responder: KeywordResponder, history_store: Arc<dyn HistoryStore>) -> Self {
        Self {
            responder: Arc::new(responder),
            history_store,
        }
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let rules_config = match &args.rules_path {
            Some(path) => rules::load_rules(path)?,
            None => {
                info!("Using built-in keyword rules");
                rules::RulesConfig::default()
            }
        };
        let history_store = initialize_history_store(args)?;
        Ok(Self::new(KeywordResponder::new(rules_config), history_store))
    }

    /// Replies to `message` and records the exchange under `conversation_id`.
    /// Blank messages are rejected before anything is stored.
    pub async fn process_message(
        &self,
        conversation_id: &str,
        message: &str
    ) -> Result<ChatReply, AgentError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AgentError::EmptyMessage);
        }

        let user_message = ChatMessage::user(message);
        let reply = self.responder.reply(message);
        let assistant_message = ChatMessage::assistant(reply.clone());

        self.history_store.record_exchange(
            conversation_id,
            user_message,
            assistant_message
        ).await?;
        if log_enabled!(Level::Debug) {
            match self.history_store.conversation_count().await {
                Ok(count) =>
                    debug!(
                        "Recorded exchange for conversation '{}' ({} conversations stored)",
                        conversation_id,
                        count
                    ),
                Err(e) =>
                    warn!(
                        "Recorded exchange for conversation '{}'; conversation count unavailable: {}",
                        conversation_id,
                        e
                    ),
            }
        }

        Ok(ChatReply {
            reply,
            conversation_id: conversation_id.to_string(),
            timestamp: now_iso(),
        })
    }

    pub async fn conversation(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, AgentError> {
        Ok(self.history_store.get_conversation(conversation_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistoryStore;
    use crate::models::chat::Role;
    use async_trait::async_trait;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn agent() -> ChatAgent {
        ChatAgent::new(KeywordResponder::default(), Arc::new(MemoryHistoryStore::new()))
    }

    fn rules_file(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    fn args_with(extra: &[&str]) -> Args {
        let mut argv = vec!["nexus-chat"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[tokio::test]
    async fn records_user_then_assistant() {
        let agent = agent();
        let reply = agent.process_message("c1", "  Halo apa bantuan ").await.unwrap();
        assert_eq!(reply.reply, "Halo! Apa kabar Anda?");
        assert_eq!(reply.conversation_id, "c1");

        let messages = agent.conversation("c1").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Halo apa bantuan");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "Halo! Apa kabar Anda?");
    }

    #[tokio::test]
    async fn blank_message_leaves_store_untouched() {
        let store = Arc::new(MemoryHistoryStore::new());
        let agent = ChatAgent::new(KeywordResponder::default(), store.clone());
        for blank in ["", "   ", "\n\t"] {
            assert!(matches!(agent.process_message("c3", blank).await, Err(AgentError::EmptyMessage)));
        }
        assert!(agent.conversation("c3").await.unwrap().is_empty());
        assert_eq!(store.conversation_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn fallback_uses_trimmed_text() {
        let agent = agent();
        let reply = agent.process_message("c2", " xyz ").await.unwrap();
        assert_eq!(
            reply.reply,
            "Terima kasih atas pertanyaan Anda: 'xyz'. Tim kami sedang memproses jawaban Anda."
        );
    }

    /// Memory store that cannot report its size.
    struct UncountedStore(MemoryHistoryStore);

    #[async_trait]
    impl HistoryStore for UncountedStore {
        async fn add_message(&self, id: &str, message: ChatMessage) -> Result<(), HistoryError> {
            self.0.add_message(id, message).await
        }

        async fn record_exchange(
            &self,
            id: &str,
            user: ChatMessage,
            assistant: ChatMessage
        ) -> Result<(), HistoryError> {
            self.0.record_exchange(id, user, assistant).await
        }

        async fn get_conversation(&self, id: &str) -> Result<Vec<ChatMessage>, HistoryError> {
            self.0.get_conversation(id).await
        }

        async fn conversation_count(&self) -> Result<usize, HistoryError> {
            Err(HistoryError::Backend("count unsupported".into()))
        }
    }

    #[tokio::test]
    async fn debug_logging_does_not_fail_a_stored_exchange() {
        let _ = env_logger::builder().is_test(true).filter_level(log::LevelFilter::Debug).try_init();
        assert!(log_enabled!(Level::Debug));

        let agent = ChatAgent::new(
            KeywordResponder::default(),
            Arc::new(UncountedStore(MemoryHistoryStore::new()))
        );
        let reply = agent.process_message("c1", "halo").await.expect("exchange succeeds");
        assert_eq!(reply.reply, "Halo! Apa kabar Anda?");
        assert_eq!(agent.conversation("c1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rules_path_replaces_builtin_table() {
        let file = rules_file(r#"{"rules":[{"keyword":"Harga","reply":"Cek katalog."}]}"#);
        let path = file.path().to_str().unwrap();
        let agent = ChatAgent::from_args(&args_with(&["--rules-path", path])).unwrap();

        assert_eq!(agent.process_message("c1", "Berapa harga?").await.unwrap().reply, "Cek katalog.");
        assert_eq!(
            agent.process_message("c1", "halo").await.unwrap().reply,
            "Terima kasih atas pertanyaan Anda: 'halo'. Tim kami sedang memproses jawaban Anda."
        );
    }

    #[tokio::test]
    async fn builtin_table_without_rules_path() {
        let agent = ChatAgent::from_args(&args_with(&[])).unwrap();
        assert_eq!(agent.process_message("c1", "halo").await.unwrap().reply, "Halo! Apa kabar Anda?");
    }

    #[test]
    fn invalid_rules_file_stops_startup() {
        let bad = rules_file("{not json");
        let path = bad.path().to_str().unwrap();
        assert!(ChatAgent::from_args(&args_with(&["--rules-path", path])).is_err());

        let missing = ChatAgent::from_args(&args_with(&["--rules-path", "/definitely/not/here.json"]));
        assert!(missing.is_err());
    }

    #[test]
    fn unknown_history_type_stops_startup() {
        let err = ChatAgent::from_args(&args_with(&["--history-type", "redis"])).err().expect("unsupported");
        assert!(err.to_string().contains("redis"));
    }
}
