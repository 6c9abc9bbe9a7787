use async_trait::async_trait;
use std::sync::Arc;

pub mod api;
mod client;
pub mod providers;
pub mod session;

pub use api::*;
pub use providers::gemini::GeminiProvider;
pub use session::ChatSession;

/// A chat-capable model bound to one remote endpoint.
#[async_trait]
pub trait ChatModel {
    fn name(&self) -> &str;

    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<ChatMessage>;
}

// Blanket implementation for Arc<dyn ChatModel> to make it easier to work with
#[async_trait]
impl ChatModel for Arc<dyn ChatModel + Send + Sync> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<ChatMessage> {
        (**self).chat(request).await
    }
}
