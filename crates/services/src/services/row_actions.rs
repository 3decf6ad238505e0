//! Per-row action menus, built from the permission gate.
//!
//! Two menu variants ship in the dashboard and both are kept as
//! configuration: the full user menu (approve, role submenu, status submenu,
//! delete user) and the compact menu without user deletion. Inventory and
//! type rows get their own two-entry menu (edit + guarded delete).

use db::models::user::{User, UserRole, UserStatus};
use db::store::DocPath;
use serde::Serialize;
use ts_rs::TS;

use super::guard::CodeLength;
use super::mutation::Mutation;
use super::permissions::{ActionKind, ActionRequest, is_action_available};

/// Which of the two observed user-row menus to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
pub enum RowActionsVariant {
    /// Approve, change role, change status, delete user.
    Full,
    /// Same menu without the delete-user entry.
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMenuItem {
    Approve,
    AssignRole(UserRole),
    AssignStatus(UserStatus),
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserMenuEntry {
    pub item: UserMenuItem,
    pub enabled: bool,
    pub code_length: Option<CodeLength>,
}

impl UserMenuEntry {
    /// The mutation this entry triggers once its guard (if any) passes.
    /// Disabled entries trigger nothing.
    pub fn mutation(&self, target: &User) -> Option<Mutation> {
        if !self.enabled {
            return None;
        }
        match self.item {
            UserMenuItem::Approve => Some(Mutation::ApproveUser {
                user: target.path(),
            }),
            UserMenuItem::AssignRole(role) => Some(Mutation::SetRole {
                user: target.path(),
                role,
            }),
            UserMenuItem::AssignStatus(status) => Some(Mutation::SetStatus {
                user: target.path(),
                status,
            }),
            UserMenuItem::Delete => Some(Mutation::DeleteUser {
                user: target.path(),
            }),
        }
    }
}

/// Build the user-row menu for one actor/target pair.
///
/// The approve entry appears only while the target is still pending, matching
/// the dashboard. Everything else is always listed, enabled or not, so the
/// operator can see what exists at their tier.
pub fn user_row_menu(
    actor: UserRole,
    target: &User,
    variant: RowActionsVariant,
) -> Vec<UserMenuEntry> {
    let mut entries = Vec::new();

    if target.role == UserRole::Pending {
        entries.push(UserMenuEntry {
            item: UserMenuItem::Approve,
            enabled: is_action_available(actor, &ActionRequest::ApproveUser { target: target.role }),
            code_length: ActionKind::ApproveUser.code_length(),
        });
    }

    for role in [
        UserRole::SysAdmin,
        UserRole::Admin,
        UserRole::Verified,
        UserRole::Pending,
    ] {
        entries.push(UserMenuEntry {
            item: UserMenuItem::AssignRole(role),
            enabled: is_action_available(
                actor,
                &ActionRequest::ChangeRole {
                    target: target.role,
                    new_role: role,
                },
            ),
            code_length: ActionKind::ChangeRole.code_length(),
        });
    }

    for status in [
        UserStatus::Active,
        UserStatus::Inactive,
        UserStatus::Suspended,
    ] {
        entries.push(UserMenuEntry {
            item: UserMenuItem::AssignStatus(status),
            enabled: is_action_available(
                actor,
                &ActionRequest::ChangeStatus {
                    target: target.status,
                    new_status: status,
                },
            ),
            code_length: ActionKind::ChangeStatus.code_length(),
        });
    }

    if variant == RowActionsVariant::Full {
        entries.push(UserMenuEntry {
            item: UserMenuItem::Delete,
            enabled: is_action_available(actor, &ActionRequest::DeleteUser),
            code_length: ActionKind::DeleteUser.code_length(),
        });
    }

    entries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemMenuItem {
    /// Opens the edit form; no direct mutation and no guard.
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMenuEntry {
    pub item: ItemMenuItem,
    pub enabled: bool,
    pub code_length: Option<CodeLength>,
}

impl ItemMenuEntry {
    pub fn mutation(&self, item_path: &DocPath) -> Option<Mutation> {
        match (self.enabled, self.item) {
            (true, ItemMenuItem::Delete) => Some(Mutation::DeleteGood {
                item: item_path.clone(),
            }),
            _ => None,
        }
    }
}

/// Inventory-row menu: edit plus a guarded, admin-only delete.
pub fn item_row_menu(actor: UserRole) -> Vec<ItemMenuEntry> {
    vec![
        ItemMenuEntry {
            item: ItemMenuItem::Edit,
            enabled: true,
            code_length: None,
        },
        ItemMenuEntry {
            item: ItemMenuItem::Delete,
            enabled: is_action_available(actor, &ActionRequest::DeleteItem),
            code_length: ActionKind::DeleteItem.code_length(),
        },
    ]
}

/// Type-manager row menu, same shape as the inventory one but over the
/// lookup collections.
pub fn type_row_menu(actor: UserRole) -> Vec<ItemMenuEntry> {
    vec![
        ItemMenuEntry {
            item: ItemMenuItem::Edit,
            enabled: true,
            code_length: None,
        },
        ItemMenuEntry {
            item: ItemMenuItem::Delete,
            enabled: is_action_available(actor, &ActionRequest::DeleteType),
            code_length: ActionKind::DeleteType.code_length(),
        },
    ]
}
