//! Transient user-facing notifications (toasts).

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

/// Fan-out channel for user-visible notifications.
///
/// Delivery is best-effort: if no subscriber is listening (the dialog that
/// triggered the mutation was closed before the outcome arrived), the
/// notification is dropped silently rather than buffered or crashed on.
#[derive(Debug, Clone)]
pub struct NotificationService {
    tx: broadcast::Sender<Notification>,
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationService {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn notify(&self, kind: NotificationKind, title: &str, description: &str) {
        let _ = self.tx.send(Notification {
            kind,
            title: title.to_string(),
            description: description.to_string(),
        });
    }

    pub fn success(&self, description: &str) {
        self.notify(NotificationKind::Success, "Success", description);
    }

    pub fn error(&self, description: &str) {
        self.notify(NotificationKind::Error, "Error", description);
    }
}
