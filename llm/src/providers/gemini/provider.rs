use std::sync::Arc;

use super::model::GeminiChatModel;
use crate::ChatModel;
use crate::client::Client;
use reqwest::header;

pub struct GeminiProvider {
    client: Client,
    base_url: String,
}

const API_VERSION: &str = "v1beta";

impl GeminiProvider {
    pub fn default(api_key: &str) -> Self {
        Self::with_base_url("https://generativelanguage.googleapis.com", api_key)
    }

    /// Create a provider with a custom base URL (e.g., for proxying).
    /// The API version path (/v1beta) is automatically appended.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_base_url(base_url, api_key)
    }

    fn with_base_url(base_url: &str, api_key: &str) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert("Content-Type", "application/json".parse().unwrap());
        headers.insert("x-goog-api-key", api_key.parse().unwrap());
        let base_url = base_url.trim_end_matches('/');
        GeminiProvider {
            client: Client::with_headers(headers),
            base_url: format!("{}/{}", base_url, API_VERSION),
        }
    }

    /// Create a chat model by bare name ("gemini-2.5-flash"), returned as
    /// Arc for sharing across threads.
    pub fn create_chat_model(&self, model_name: &str) -> Arc<dyn ChatModel + Send + Sync> {
        let model_name = model_name.trim_start_matches("models/").to_string();
        Arc::new(GeminiChatModel::new(
            self.client.clone(),
            self.base_url.clone(),
            model_name,
        ))
    }
}
