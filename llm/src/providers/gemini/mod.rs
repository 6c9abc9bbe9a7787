mod api;
mod model;
mod provider;

pub use model::GeminiChatModel;
pub use provider::GeminiProvider;
