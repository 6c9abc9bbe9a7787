//! Single-slot toast notifications.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub id: String,
    pub title: String,
    pub message: String,
}

impl NotificationPayload {
    /// The scheduled one-shot weather alert.
    pub fn weather_alert() -> Self {
        Self {
            id: "1".to_string(),
            title: "Weather Alert".to_string(),
            message: "Heavy rain is expected in your area tomorrow. \
Consider delaying pesticide application."
                .to_string(),
        }
    }

    /// Confirmation toast after a subscription is accepted.
    pub fn subscription_confirmed(crop: &str) -> Self {
        Self {
            id: "sub1".to_string(),
            title: "Subscription Successful!".to_string(),
            message: format!("You've subscribed to alerts for {crop}."),
        }
    }
}

/// Holds at most one notification; a newer one replaces the old outright.
#[derive(Default)]
pub struct NotificationController {
    active: Option<NotificationPayload>,
}

impl NotificationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, payload: NotificationPayload) {
        self.active = Some(payload);
    }

    pub fn dismiss(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&NotificationPayload> {
        self.active.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_notification_replaces_the_visible_one() {
        let mut toasts = NotificationController::new();
        toasts.show(NotificationPayload::weather_alert());
        toasts.show(NotificationPayload::subscription_confirmed("rice"));

        let active = toasts.active().unwrap();
        assert_eq!(active.title, "Subscription Successful!");
        assert_eq!(active.message, "You've subscribed to alerts for rice.");
    }

    #[test]
    fn dismiss_clears_the_slot() {
        let mut toasts = NotificationController::new();
        toasts.show(NotificationPayload::weather_alert());

        toasts.dismiss();
        assert!(toasts.active().is_none());

        // Dismissing an empty slot is harmless.
        toasts.dismiss();
        assert!(toasts.active().is_none());
    }
}
