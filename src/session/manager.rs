//! Session lifecycle management
//!
//! One logical conversation with the remote model. The session tracks a
//! local transcript for display and a `context_sent` flag that ensures
//! the knowledge context is injected exactly once per session: the first
//! turn sent while at least one knowledge file exists carries the full
//! instruction template plus concatenated file contents, every later turn
//! carries only the new message.
//!
//! The manager has no internal lock; callers are expected to keep a
//! single call in flight per session (the CLI loop does this naturally).

use crate::providers::{Conversation, Provider};
use crate::session::prompt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Role of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The customer's messages
    User,
    /// Replies from the remote model
    Assistant,
    /// Local notices (resets, dispatch failures)
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "You"),
            Self::Assistant => write!(f, "Assistant"),
            Self::System => write!(f, "System"),
        }
    }
}

/// One entry in the local transcript
///
/// The transcript exists only for display; the authoritative dialogue
/// history lives behind the provider's conversation handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Who produced the text
    pub role: Role,
    /// The message text
    pub text: String,
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,
}

/// Owned session state: transcript plus the context-sent flag
#[derive(Debug, Default)]
struct Session {
    transcript: Vec<TranscriptEntry>,
    context_sent: bool,
}

impl Session {
    fn push(&mut self, role: Role, text: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        });
    }

    fn clear(&mut self) {
        self.transcript.clear();
        self.context_sent = false;
    }
}

/// Orchestrates one conversation with the remote model
///
/// # Examples
///
/// ```no_run
/// use quotegen::config::ProviderConfig;
/// use quotegen::providers::create_provider;
/// use quotegen::session::SessionManager;
///
/// # async fn example() -> quotegen::error::Result<()> {
/// let config = ProviderConfig::default();
/// let provider = create_provider("gemini", &config)?;
/// let mut session = SessionManager::new(provider);
/// let reply = session.send("price of widget A?", &[]).await;
/// println!("{}", reply);
/// # Ok(())
/// # }
/// ```
pub struct SessionManager {
    provider: Box<dyn Provider>,
    conversation: Box<dyn Conversation>,
    session: Session,
}

impl SessionManager {
    /// Create a manager with a fresh session
    ///
    /// # Arguments
    ///
    /// * `provider` - The remote model provider to converse with
    pub fn new(provider: Box<dyn Provider>) -> Self {
        let conversation = provider.start_conversation();
        Self {
            provider,
            conversation,
            session: Session::default(),
        }
    }

    /// Reset the session
    ///
    /// Starts a fresh conversation handle, clears the transcript, and
    /// clears the context-sent flag so the next turn re-sends the
    /// knowledge context. Resetting a fresh session is harmless.
    pub fn reset(&mut self) {
        self.conversation = self.provider.start_conversation();
        self.session.clear();
        tracing::info!("Chat session has been reset");
    }

    /// Whether the knowledge context has been sent in this session
    pub fn context_sent(&self) -> bool {
        self.session.context_sent
    }

    /// The local transcript of this session
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.session.transcript
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Model identifier the provider is configured for
    pub fn provider_model(&self) -> String {
        self.provider.model()
    }

    /// Send one user message and return the reply
    ///
    /// On the first turn of a session with a non-empty knowledge set, the
    /// dispatched payload is the instruction template with the gathered
    /// knowledge content substituted, followed by the user's question;
    /// `context_sent` is committed before dispatch. Every other turn
    /// dispatches the user text verbatim.
    ///
    /// Dispatch failures never propagate: the formatted error message is
    /// returned as the reply and recorded as a system transcript entry.
    ///
    /// # Arguments
    ///
    /// * `user_text` - The customer's message for this turn
    /// * `knowledge_files` - Stored paths of the current knowledge set
    pub async fn send(&mut self, user_text: &str, knowledge_files: &[PathBuf]) -> String {
        self.session.push(Role::User, user_text);

        let payload = if !self.session.context_sent && !knowledge_files.is_empty() {
            tracing::info!(
                "Sending initial knowledge context ({} files) to {}",
                knowledge_files.len(),
                self.provider.name()
            );
            self.session.context_sent = true;
            let knowledge = prompt::gather_knowledge(knowledge_files);
            prompt::build_context_prompt(&knowledge, user_text)
        } else {
            user_text.to_string()
        };

        match self.conversation.send_turn(&payload).await {
            Ok(reply) => {
                self.session.push(Role::Assistant, reply.clone());
                reply
            }
            Err(e) => {
                let message = format!(
                    "Error while communicating with the {} API: {}",
                    self.provider.name(),
                    e
                );
                tracing::error!("{}", message);
                self.session.push(Role::System, message.clone());
                message
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{QuotegenError, Result};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Scripted provider that records every dispatched payload
    struct StubProvider {
        payloads: Arc<Mutex<Vec<String>>>,
        fail: bool,
        started: Arc<Mutex<usize>>,
    }

    struct StubConversation {
        payloads: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl StubProvider {
        fn new(fail: bool) -> Self {
            Self {
                payloads: Arc::new(Mutex::new(Vec::new())),
                fail,
                started: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl Provider for StubProvider {
        fn name(&self) -> &'static str {
            "Stub"
        }

        fn model(&self) -> String {
            "stub-model".to_string()
        }

        fn start_conversation(&self) -> Box<dyn Conversation> {
            *self.started.lock().unwrap() += 1;
            Box::new(StubConversation {
                payloads: self.payloads.clone(),
                fail: self.fail,
            })
        }
    }

    #[async_trait]
    impl Conversation for StubConversation {
        async fn send_turn(&mut self, text: &str) -> Result<String> {
            self.payloads.lock().unwrap().push(text.to_string());
            if self.fail {
                Err(QuotegenError::Provider("connection refused".to_string()).into())
            } else {
                Ok(format!("reply to turn {}", self.payloads.lock().unwrap().len()))
            }
        }
    }

    fn knowledge_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_context_sent_false_until_first_send_with_knowledge() {
        let provider = StubProvider::new(false);
        let mut manager = SessionManager::new(Box::new(provider));
        assert!(!manager.context_sent());

        let dir = tempfile::tempdir().unwrap();
        let file = knowledge_file(&dir, "a.txt", "Widget A: 10 EUR");
        manager.send("price of widget A?", &[file]).await;
        assert!(manager.context_sent());
    }

    #[tokio::test]
    async fn test_empty_knowledge_set_never_flips_context_sent() {
        let provider = StubProvider::new(false);
        let payloads = provider.payloads.clone();
        let mut manager = SessionManager::new(Box::new(provider));

        manager.send("hello", &[]).await;
        manager.send("anyone there?", &[]).await;

        assert!(!manager.context_sent());
        let sent = payloads.lock().unwrap();
        assert_eq!(sent.as_slice(), ["hello", "anyone there?"]);
    }

    #[tokio::test]
    async fn test_first_payload_carries_context_second_does_not() {
        let provider = StubProvider::new(false);
        let payloads = provider.payloads.clone();
        let mut manager = SessionManager::new(Box::new(provider));

        let dir = tempfile::tempdir().unwrap();
        let file = knowledge_file(&dir, "a.txt", "Widget A: 10 EUR");
        let files = vec![file];

        manager.send("price of widget A?", &files).await;
        manager.send("and widget B?", &files).await;

        let sent = payloads.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("--- BEGIN DOCUMENTATION ---"));
        assert!(sent[0].contains("Widget A: 10 EUR"));
        assert!(sent[0].contains("price of widget A?"));
        assert_eq!(sent[1], "and widget B?");
        assert!(!sent[1].contains("Widget A: 10 EUR"));
    }

    #[tokio::test]
    async fn test_reset_clears_state_and_restarts_conversation() {
        let provider = StubProvider::new(false);
        let started = provider.started.clone();
        let mut manager = SessionManager::new(Box::new(provider));

        let dir = tempfile::tempdir().unwrap();
        let file = knowledge_file(&dir, "a.txt", "Widget A: 10 EUR");
        manager.send("price of widget A?", &[file]).await;
        assert!(manager.context_sent());
        assert_eq!(manager.transcript().len(), 2);

        manager.reset();
        assert!(!manager.context_sent());
        assert!(manager.transcript().is_empty());
        // One conversation at construction, one at reset
        assert_eq!(*started.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_failure_returns_error_string_and_commits_flag() {
        let provider = StubProvider::new(true);
        let mut manager = SessionManager::new(Box::new(provider));

        let dir = tempfile::tempdir().unwrap();
        let file = knowledge_file(&dir, "a.txt", "Widget A: 10 EUR");
        let reply = manager.send("price of widget A?", &[file]).await;

        assert!(reply.starts_with("Error while communicating with the Stub API:"));
        assert!(reply.contains("connection refused"));
        // Attempted send counts: the context is considered sent
        assert!(manager.context_sent());
    }

    #[tokio::test]
    async fn test_transcript_records_roles_in_order() {
        let provider = StubProvider::new(false);
        let mut manager = SessionManager::new(Box::new(provider));

        manager.send("hello", &[]).await;

        let transcript = manager.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[0].text, "hello");
        assert_eq!(transcript[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_unreadable_file_contributes_empty_context() {
        let provider = StubProvider::new(false);
        let payloads = provider.payloads.clone();
        let mut manager = SessionManager::new(Box::new(provider));

        let missing = PathBuf::from("/nonexistent/ghost.txt");
        manager.send("price of widget A?", &[missing]).await;

        // The turn still went out with the template, just no file content
        let sent = payloads.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("--- BEGIN DOCUMENTATION ---"));
        assert!(manager.context_sent());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "You");
        assert_eq!(Role::Assistant.to_string(), "Assistant");
        assert_eq!(Role::System.to_string(), "System");
    }
}
