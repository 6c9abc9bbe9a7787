//! Session-bound wrapper over a chat model.
//!
//! The session owns the cumulative dialogue context and the fixed system
//! instruction, so callers only hand over the newest user utterance. The
//! display log kept by the UI is a view; what the bot "remembers" is
//! whatever this session has accumulated, and the two can diverge after a
//! reset. The generation counter makes that divergence observable.

use std::sync::Arc;

use crate::{ChatMessage, ChatModel, ChatRequest};

pub struct ChatSession {
    model: Arc<dyn ChatModel + Send + Sync>,
    system_instruction: String,
    history: Vec<ChatMessage>,
    generation: u64,
}

impl ChatSession {
    /// Bind a model to a fixed system instruction. Built once at startup
    /// and reused for the lifetime of the process.
    pub fn new(
        model: Arc<dyn ChatModel + Send + Sync>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            model,
            system_instruction: system_instruction.into(),
            history: Vec::new(),
            generation: 0,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Current session generation. Bumped by `reset`; replies tagged with
    /// an older generation belong to a context that no longer exists.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Send one user utterance and return the reply text.
    ///
    /// The request carries the full accumulated context; a failed call is
    /// retried once and, if it fails again, leaves the context untouched so
    /// the remote view never records a turn the user did not see answered.
    pub async fn send(&mut self, text: &str) -> anyhow::Result<String> {
        let user = ChatMessage::user(text);

        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(&self.system_instruction));
        messages.extend(self.history.iter().cloned());
        messages.push(user.clone());
        let request = ChatRequest::new(&messages);

        let reply = match self.model.chat(&request).await {
            Ok(reply) => reply,
            Err(first) => {
                tracing::warn!(model = self.model.name(), error = %first, "chat request failed, retrying once");
                self.model.chat(&request).await?
            }
        };

        self.history.push(user);
        self.history.push(reply.clone());
        Ok(reply.text)
    }

    /// Drop the accumulated context and start a fresh generation.
    pub fn reset(&mut self) {
        self.history.clear();
        self.generation += 1;
        tracing::info!(generation = self.generation, "chat session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    /// Scripted model: fails `failures` times, then echoes the request.
    struct ScriptedModel {
        failures: AtomicUsize,
        seen_requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedModel {
        fn failing(times: usize) -> Arc<Self> {
            Arc::new(Self {
                failures: AtomicUsize::new(times),
                seen_requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn chat(&self, request: &ChatRequest) -> anyhow::Result<ChatMessage> {
            self.seen_requests.lock().unwrap().push(request.clone());
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                anyhow::bail!("scripted failure");
            }
            let last = request.messages().last().unwrap().text.clone();
            Ok(ChatMessage::assistant(format!("echo: {}", last)))
        }
    }

    #[tokio::test]
    async fn send_accumulates_context_across_turns() {
        let model = ScriptedModel::failing(0);
        let mut session = ChatSession::new(model.clone(), "persona");

        session.send("first").await.unwrap();
        session.send("second").await.unwrap();

        let requests = model.seen_requests.lock().unwrap();
        // Second request: system + first user + first reply + second user.
        assert_eq!(requests[1].messages().len(), 4);
        assert_eq!(requests[1].messages()[0].role, crate::Role::System);
        assert_eq!(requests[1].messages()[3].text, "second");
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once() {
        let model = ScriptedModel::failing(1);
        let mut session = ChatSession::new(model.clone(), "persona");

        let reply = session.send("hello").await.unwrap();
        assert_eq!(reply, "echo: hello");
        assert_eq!(model.seen_requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn repeated_failure_leaves_context_untouched() {
        let model = ScriptedModel::failing(2);
        let mut session = ChatSession::new(model.clone(), "persona");

        assert!(session.send("hello").await.is_err());

        // Next successful send must not include the failed turn.
        let reply = session.send("again").await.unwrap();
        assert_eq!(reply, "echo: again");
        let requests = model.seen_requests.lock().unwrap();
        let last = requests.last().unwrap();
        assert_eq!(last.messages().len(), 2); // system + "again"
    }

    #[tokio::test]
    async fn reset_bumps_generation_and_clears_context() {
        let model = ScriptedModel::failing(0);
        let mut session = ChatSession::new(model.clone(), "persona");

        session.send("remember me").await.unwrap();
        assert_eq!(session.generation(), 0);

        session.reset();
        assert_eq!(session.generation(), 1);

        session.send("fresh start").await.unwrap();
        let requests = model.seen_requests.lock().unwrap();
        let last = requests.last().unwrap();
        assert_eq!(last.messages().len(), 2); // system + new user turn only
    }
}
