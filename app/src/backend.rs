//! Backend worker thread.
//!
//! Owns the tokio runtime, the chat session, and every network-facing
//! concern, so the UI thread never blocks. Commands arrive over a
//! crossbeam channel; events go back the same way.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use llm::ChatSession;
use tracing::{info, warn};

use crate::events::{AppCommand, CoreEvent};
use crate::notify::NotificationPayload;
use crate::subscribe::Locator;

/// Persona given to the model once per session.
pub const SYSTEM_INSTRUCTION: &str = "\
You are a world-class Farmer Support Chatbot. Your goal is to provide helpful, actionable advice to farmers.
You can answer questions about:
1.  **Crop-specific advice**: Based on weather, planting dates, and location. Supported crops are rice, wheat, maize, cotton, sugarcane, pulses, and vegetables.
2.  **Weather Information**: Provide current weather and forecasts.
3.  **Market Prices**: Give current market prices for various crops. (You can use placeholder data if you don't have real-time access).
4.  **Notifications**: Explain that users can subscribe to alerts for fertilizer/pesticide reminders, and weather warnings like rain, frost, or heat stress.

When a user asks a question, provide a clear, concise, and friendly answer. If a question is ambiguous, ask for clarification.
If the user's query is outside the scope of farming, politely decline to answer and steer the conversation back to agriculture.
Keep your answers structured, using bullet points for lists of advice or data.
Example response for \"advice for my wheat crop\":
\"To give you the best advice for your wheat crop, I need to know your location. Could you please share it? You can also subscribe to get personalized alerts!\"";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Spawn the worker. The returned handle joins when the command channel
/// closes, which happens when the UI drops its sender on shutdown.
pub fn spawn_backend(
    commands: Receiver<AppCommand>,
    events: Sender<CoreEvent>,
    session: ChatSession,
    locator: Arc<dyn Locator>,
    notify_after: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                warn!(error = %e, "failed to start backend runtime");
                return;
            }
        };
        runtime.block_on(run(commands, events, session, locator, notify_after));
    })
}

async fn run(
    commands: Receiver<AppCommand>,
    events: Sender<CoreEvent>,
    mut session: ChatSession,
    locator: Arc<dyn Locator>,
    notify_after: Duration,
) {
    // One-shot demo weather alert, scheduled at startup.
    let alert_tx = events.clone();
    tokio::spawn(async move {
        tokio::time::sleep(notify_after).await;
        let _ = alert_tx.send(CoreEvent::Notification(NotificationPayload::weather_alert()));
    });

    loop {
        match commands.try_recv() {
            Ok(command) => handle(command, &events, &mut session, &locator).await,
            Err(TryRecvError::Empty) => {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Err(TryRecvError::Disconnected) => break,
        }
    }
}

async fn handle(
    command: AppCommand,
    events: &Sender<CoreEvent>,
    session: &mut ChatSession,
    locator: &Arc<dyn Locator>,
) {
    match command {
        AppCommand::SendMessage(text) => {
            // Tag with the generation at send time; a reset while the
            // request is in flight makes this reply stale.
            let generation = session.generation();
            match session.send(&text).await {
                Ok(reply) => {
                    let _ = events.send(CoreEvent::BotReply {
                        generation,
                        text: reply,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "chat send failed after retry");
                    let _ = events.send(CoreEvent::SendFailed { generation });
                }
            }
        }
        AppCommand::Subscribe(subscription) => {
            info!(
                crop = %subscription.crop,
                lat = subscription.location.lat,
                lon = subscription.location.lon,
                planting_date = ?subscription.planting_date,
                "alert subscription registered"
            );
            let crop = subscription.crop.to_string();
            let _ = events.send(CoreEvent::Notification(
                NotificationPayload::subscription_confirmed(&crop),
            ));
        }
        AppCommand::Locate => {
            let locator = Arc::clone(locator);
            let events = events.clone();
            tokio::spawn(async move {
                let result = locator.locate().await.map_err(|e| e.to_string());
                let _ = events.send(CoreEvent::Location(result));
            });
        }
        AppCommand::ResetSession => {
            session.reset();
            let _ = events.send(CoreEvent::SessionReset {
                generation: session.generation(),
            });
        }
    }
}
