//! Developer-facing diagnostic events for rejected store operations.
//!
//! This is the permission-debugging channel: when the store rejects a
//! mutation, the executor emits a structured event here describing what was
//! attempted, separate from the generic notification shown to the operator.
//! Events may carry internal path structure and rejected payloads, so they
//! must never be rendered to end users.
//!
//! The bus is an explicit, session-scoped value injected into the executor,
//! not a process-global singleton; its lifetime ends with the application
//! session that created it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};
use tokio::sync::broadcast;
use ts_rs::TS;

/// Store operation kind, as reported in diagnostics.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

/// A store rejection, with the rejected payload attached for writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct PermissionDenialEvent {
    /// Target path of the rejected operation (`collection` or
    /// `collection/id`).
    pub path: String,
    pub operation: OperationKind,
    /// Payload the store rejected. `None` for deletes.
    pub request_data: Option<Value>,
}

/// Session-scoped event bus for [`PermissionDenialEvent`]s.
#[derive(Debug, Clone)]
pub struct DiagnosticBus {
    tx: broadcast::Sender<PermissionDenialEvent>,
}

impl Default for DiagnosticBus {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(32);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PermissionDenialEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: PermissionDenialEvent) {
        tracing::warn!(
            path = %event.path,
            operation = %event.operation,
            "store rejected operation"
        );
        let _ = self.tx.send(event);
    }
}
