//! Commands and events crossing the UI/backend bridge.

use crate::notify::NotificationPayload;
use crate::subscribe::{Coordinates, Subscription};

/// Reply shown when the model call fails after its retry.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again.";

/// Opening bot turn, shown before any user input.
pub const GREETING: &str = "Hello! I'm your farming assistant. How can I help you today? \
You can ask me about crop advice, weather, or market prices.";

/// Requests sent from the UI thread to the backend worker.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Send one user message through the chat session.
    SendMessage(String),
    /// Register an alert subscription.
    Subscribe(Subscription),
    /// Resolve the device location for the subscription form.
    Locate,
    /// Discard the conversation context and start a fresh session.
    ResetSession,
}

/// Events flowing back from the backend worker to the UI thread.
///
/// Replies carry the session generation current when the send started; the
/// shell drops any reply whose generation no longer matches.
#[derive(Debug, Clone)]
pub enum CoreEvent {
    BotReply { generation: u64, text: String },
    SendFailed { generation: u64 },
    Notification(NotificationPayload),
    Location(Result<Coordinates, String>),
    SessionReset { generation: u64 },
}
