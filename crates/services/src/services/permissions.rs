//! Permission gate deciding which row actions are offered at all.
//!
//! This is a UI-level convenience gate: a pure predicate evaluated on every
//! render. It must never be the sole safeguard; the store's own access rules
//! are the authoritative enforcement and reject anything this gate wrongly
//! lets through.

use db::models::user::{UserRole, UserStatus};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use super::guard::CodeLength;

/// The kinds of operator actions subject to gating.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    ApproveUser,
    ChangeRole,
    ChangeStatus,
    DeleteUser,
    DeleteItem,
    DeleteType,
}

impl ActionKind {
    /// Minimum privilege tier required to be offered this action.
    pub fn min_role(self) -> UserRole {
        // Every gated action is admin-only today; the tier comparison keeps
        // the table extensible without touching call sites.
        UserRole::Admin
    }

    /// Confirmation-code length the action demands, if any. Approval is the
    /// one mutation deliberately left unguarded.
    pub fn code_length(self) -> Option<CodeLength> {
        match self {
            ActionKind::ApproveUser => None,
            ActionKind::ChangeRole | ActionKind::ChangeStatus => Some(CodeLength::Six),
            ActionKind::DeleteUser | ActionKind::DeleteItem | ActionKind::DeleteType => {
                Some(CodeLength::Four)
            }
        }
    }
}

/// A concrete action instance against one row, carrying whatever target
/// state the availability rule needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRequest {
    /// Offered only while the target still awaits approval.
    ApproveUser { target: UserRole },
    ChangeRole { target: UserRole, new_role: UserRole },
    ChangeStatus {
        target: UserStatus,
        new_status: UserStatus,
    },
    DeleteUser,
    DeleteItem,
    DeleteType,
}

impl ActionRequest {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRequest::ApproveUser { .. } => ActionKind::ApproveUser,
            ActionRequest::ChangeRole { .. } => ActionKind::ChangeRole,
            ActionRequest::ChangeStatus { .. } => ActionKind::ChangeStatus,
            ActionRequest::DeleteUser => ActionKind::DeleteUser,
            ActionRequest::DeleteItem => ActionKind::DeleteItem,
            ActionRequest::DeleteType => ActionKind::DeleteType,
        }
    }
}

/// Whether the action is offered (enabled) for this actor and target.
///
/// Two rules: the actor's tier must be at or above the action's minimum, and
/// assigning a role or status the target already has is unavailable (the
/// idempotence short-circuit). Pure; never errors. Wire strings that fail to
/// parse into a [`UserRole`] never reach this function, which is the
/// "unknown role gets no actions" default.
pub fn is_action_available(actor: UserRole, request: &ActionRequest) -> bool {
    if actor < request.kind().min_role() {
        return false;
    }
    match request {
        ActionRequest::ApproveUser { target } => *target == UserRole::Pending,
        ActionRequest::ChangeRole { target, new_role } => target != new_role,
        ActionRequest::ChangeStatus { target, new_status } => target != new_status,
        ActionRequest::DeleteUser | ActionRequest::DeleteItem | ActionRequest::DeleteType => true,
    }
}
