//! Mutation executor: the single place every guarded (and form-submitted)
//! state change goes through on its way to the store.

use std::sync::Arc;

use db::models::good::{GOODS_COLLECTION, ValidGood};
use db::models::type_doc::{TypeCategory, ValidType};
use db::models::user::{UserRole, UserStatus};
use db::store::{DocPath, DocumentStore};
use serde_json::{Map, Value};

use super::diagnostics::{DiagnosticBus, OperationKind, PermissionDenialEvent};
use super::guard::{ConfirmationGuard, Verification};
use super::notification::NotificationService;

/// Every mutation the dashboard can issue, as one tagged variant consumed
/// uniformly by the executor instead of per-entity handlers.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Unguarded: promote a pending user to verified.
    ApproveUser { user: DocPath },
    SetRole { user: DocPath, role: UserRole },
    SetStatus { user: DocPath, status: UserStatus },
    DeleteUser { user: DocPath },
    CreateGood { good: ValidGood, created_by: String },
    UpdateGood { item: DocPath, good: ValidGood },
    DeleteGood { item: DocPath },
    CreateType {
        category: TypeCategory,
        type_doc: ValidType,
    },
    UpdateType { path: DocPath, type_doc: ValidType },
    DeleteType { path: DocPath },
}

impl Mutation {
    pub fn operation(&self) -> OperationKind {
        match self {
            Mutation::CreateGood { .. } | Mutation::CreateType { .. } => OperationKind::Create,
            Mutation::ApproveUser { .. }
            | Mutation::SetRole { .. }
            | Mutation::SetStatus { .. }
            | Mutation::UpdateGood { .. }
            | Mutation::UpdateType { .. } => OperationKind::Update,
            Mutation::DeleteUser { .. }
            | Mutation::DeleteGood { .. }
            | Mutation::DeleteType { .. } => OperationKind::Delete,
        }
    }

    fn success_message(&self) -> String {
        match self {
            Mutation::ApproveUser { .. } => "User has been approved.".to_string(),
            Mutation::SetRole { role, .. } => format!("User role updated to {role}."),
            Mutation::SetStatus { status, .. } => format!("User status updated to {status}."),
            Mutation::DeleteUser { .. } => "User deleted successfully from database.".to_string(),
            Mutation::CreateGood { .. } => "Item added successfully.".to_string(),
            Mutation::UpdateGood { .. } => "Item updated successfully.".to_string(),
            Mutation::DeleteGood { .. } => "Item deleted successfully.".to_string(),
            Mutation::CreateType { .. } => "Type added.".to_string(),
            Mutation::UpdateType { .. } => "Type updated.".to_string(),
            Mutation::DeleteType { .. } => "Type deleted.".to_string(),
        }
    }

    /// Generic, non-leaking operator-facing failure message. Internal detail
    /// goes to the diagnostic bus only.
    fn failure_message(&self) -> &'static str {
        match self {
            Mutation::ApproveUser { .. } => "Could not approve user.",
            Mutation::SetRole { .. } | Mutation::SetStatus { .. } => "Could not update user.",
            Mutation::DeleteUser { .. } => "Could not delete user.",
            Mutation::CreateGood { .. } => "Could not add item.",
            Mutation::UpdateGood { .. } => "Could not update item.",
            Mutation::DeleteGood { .. } => "Could not delete item.",
            Mutation::CreateType { .. } => "Could not add type.",
            Mutation::UpdateType { .. } => "Could not update type.",
            Mutation::DeleteType { .. } => "Could not delete type.",
        }
    }
}

/// What the operator is told happened. Failures never propagate as errors
/// into the caller's render path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { message: String },
    Failure { message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Success { message } | Outcome::Failure { message } => message,
        }
    }
}

/// Result of submitting a confirmation code for a pending mutation.
#[derive(Debug)]
pub enum ConfirmResult {
    /// Code matched; the dialog closed and the mutation ran exactly once.
    Applied(Outcome),
    /// Code mismatch; dialog stays open for another attempt.
    Rejected,
    /// No dialog was open.
    NotOpen,
}

enum Plan {
    Create {
        collection: String,
        fields: Map<String, Value>,
    },
    Update {
        path: DocPath,
        fields: Map<String, Value>,
    },
    Delete { path: DocPath },
}

/// Issues mutations against the external store and reports outcomes on the
/// two independent channels: operator notifications and developer
/// diagnostics.
#[derive(Clone)]
pub struct MutationExecutor {
    store: Arc<dyn DocumentStore>,
    notifications: NotificationService,
    diagnostics: DiagnosticBus,
}

impl MutationExecutor {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        notifications: NotificationService,
        diagnostics: DiagnosticBus,
    ) -> Self {
        Self {
            store,
            notifications,
            diagnostics,
        }
    }

    /// Apply one mutation: exactly one store round-trip.
    ///
    /// Derived item totals are recomputed here from the validated form on
    /// every create/edit, never patched incrementally.
    pub async fn apply(&self, mutation: Mutation) -> Outcome {
        let operation = mutation.operation();
        let plan = Self::plan(&mutation);

        let (target, result) = match &plan {
            Plan::Create { collection, fields } => {
                let result = self
                    .store
                    .create(collection, fields.clone())
                    .await
                    .map(|_| ());
                (collection.clone(), result)
            }
            Plan::Update { path, fields } => {
                (path.to_string(), self.store.update(path, fields.clone()).await)
            }
            Plan::Delete { path } => (path.to_string(), self.store.delete(path).await),
        };

        match result {
            Ok(()) => {
                let message = mutation.success_message();
                tracing::info!(path = %target, operation = %operation, "mutation applied");
                self.notifications.success(&message);
                Outcome::Success { message }
            }
            Err(err) => {
                tracing::warn!(path = %target, operation = %operation, error = %err, "mutation failed");
                self.diagnostics.emit(PermissionDenialEvent {
                    path: target,
                    operation,
                    request_data: match plan {
                        Plan::Create { fields, .. } | Plan::Update { fields, .. } => {
                            Some(Value::Object(fields))
                        }
                        Plan::Delete { .. } => None,
                    },
                });
                let message = mutation.failure_message().to_string();
                self.notifications.error(&message);
                Outcome::Failure { message }
            }
        }
    }

    /// Submit an entered confirmation code for the guard's pending mutation.
    ///
    /// On a match the dialog closes synchronously before the store call is
    /// issued, so the executor runs at most once per verification.
    pub async fn confirm(
        &self,
        guard: &mut ConfirmationGuard<Mutation>,
        entered: &str,
    ) -> ConfirmResult {
        match guard.confirm(entered) {
            Verification::Verified(mutation) => ConfirmResult::Applied(self.apply(mutation).await),
            Verification::Rejected => ConfirmResult::Rejected,
            Verification::NotOpen => ConfirmResult::NotOpen,
        }
    }

    fn plan(mutation: &Mutation) -> Plan {
        match mutation {
            Mutation::ApproveUser { user } => Plan::Update {
                path: user.clone(),
                fields: field("role", UserRole::Verified),
            },
            Mutation::SetRole { user, role } => Plan::Update {
                path: user.clone(),
                fields: field("role", *role),
            },
            Mutation::SetStatus { user, status } => Plan::Update {
                path: user.clone(),
                fields: field("status", *status),
            },
            Mutation::DeleteUser { user } => Plan::Delete { path: user.clone() },
            Mutation::CreateGood { good, created_by } => Plan::Create {
                collection: GOODS_COLLECTION.to_string(),
                fields: good.create_fields(created_by),
            },
            Mutation::UpdateGood { item, good } => Plan::Update {
                path: item.clone(),
                fields: good.update_fields(),
            },
            Mutation::DeleteGood { item } => Plan::Delete { path: item.clone() },
            Mutation::CreateType { category, type_doc } => Plan::Create {
                collection: category.collection().to_string(),
                fields: type_doc.fields(),
            },
            Mutation::UpdateType { path, type_doc } => Plan::Update {
                path: path.clone(),
                fields: type_doc.fields(),
            },
            Mutation::DeleteType { path } => Plan::Delete { path: path.clone() },
        }
    }
}

fn field(name: &str, value: impl serde::Serialize) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(
        name.to_string(),
        serde_json::to_value(value).unwrap_or(Value::Null),
    );
    fields
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use db::models::good::{Gender, GoodForm, Origin};
    use db::store::MemoryStore;

    use super::*;
    use crate::services::guard::CodeLength;
    use crate::services::notification::NotificationKind;

    fn executor_with_store() -> (MutationExecutor, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let executor = MutationExecutor::new(
            store.clone(),
            NotificationService::new(),
            DiagnosticBus::new(),
        );
        (executor, store)
    }

    fn good_form() -> GoodForm {
        GoodForm {
            invoice_number: "INV-0001".into(),
            invoice_date: Utc::now(),
            model: "T-Shirt".into(),
            clothing_type: "Shirts".into(),
            comp: "Cotton".into(),
            origin: Origin::Cee,
            gender: Gender::Male,
            quantity: 3,
            area: 1.2,
            value: 10.0,
            accessories_value: 5.0,
            weight: 2.0,
            accessories_weight: 0.5,
        }
    }

    #[tokio::test]
    async fn set_role_updates_the_user_document() {
        let (executor, store) = executor_with_store();
        let path = DocPath::new("users", "u1");
        store.insert(&path, field("role", UserRole::Pending));

        let outcome = executor
            .apply(Mutation::SetRole {
                user: path.clone(),
                role: UserRole::Verified,
            })
            .await;

        assert_eq!(
            outcome,
            Outcome::Success {
                message: "User role updated to verified.".into()
            }
        );
        assert_eq!(store.get(&path).unwrap()["role"], "verified");
    }

    #[tokio::test]
    async fn approve_promotes_pending_to_verified() {
        let (executor, store) = executor_with_store();
        let path = DocPath::new("users", "u1");
        store.insert(&path, field("role", UserRole::Pending));

        let outcome = executor.apply(Mutation::ApproveUser { user: path.clone() }).await;

        assert!(outcome.is_success());
        assert_eq!(store.get(&path).unwrap()["role"], "verified");
    }

    #[tokio::test]
    async fn create_good_writes_computed_totals() {
        let (executor, store) = executor_with_store();
        let good = good_form().validate().unwrap();

        let outcome = executor
            .apply(Mutation::CreateGood {
                good,
                created_by: "u1".into(),
            })
            .await;

        assert!(outcome.is_success());
        let docs = store.docs_in("goods");
        assert_eq!(docs.len(), 1);
        let (_, doc) = &docs[0];
        assert_eq!(doc["totalValue"], 35.0);
        assert_eq!(doc["totalWeight"], 2.5);
        assert_eq!(doc["createdBy"], "u1");
    }

    #[tokio::test]
    async fn update_good_recomputes_totals_from_the_form() {
        let (executor, store) = executor_with_store();
        let path = DocPath::new("goods", "g1");
        let mut stale = good_form().validate().unwrap().create_fields("u1");
        stale.insert("totalValue".into(), Value::from(999.0));
        store.insert(&path, stale);

        let mut form = good_form();
        form.quantity = 2;
        let outcome = executor
            .apply(Mutation::UpdateGood {
                item: path.clone(),
                good: form.validate().unwrap(),
            })
            .await;

        assert!(outcome.is_success());
        // 2 * 10.00 + 5.00, not the stale stored value.
        assert_eq!(store.get(&path).unwrap()["totalValue"], 25.0);
    }

    #[tokio::test]
    async fn rejected_delete_reports_on_both_channels() {
        let (executor, store) = executor_with_store();
        let path = DocPath::new("goods", "g1");
        store.insert(&path, Map::new());
        store.deny_writes("goods");

        let mut notifications = executor.notifications.subscribe();
        let mut diagnostics = executor.diagnostics.subscribe();

        let outcome = executor.apply(Mutation::DeleteGood { item: path.clone() }).await;

        assert_eq!(
            outcome,
            Outcome::Failure {
                message: "Could not delete item.".into()
            }
        );

        let notification = notifications.recv().await.unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.description, "Could not delete item.");
        // The user-facing message never leaks the target path.
        assert!(!notification.description.contains("goods/g1"));

        let event = diagnostics.recv().await.unwrap();
        assert_eq!(event.path, "goods/g1");
        assert_eq!(event.operation, OperationKind::Delete);
        assert!(event.request_data.is_none());
    }

    #[tokio::test]
    async fn rejected_write_carries_the_rejected_payload() {
        let (executor, store) = executor_with_store();
        store.deny_writes("goods");
        let mut diagnostics = executor.diagnostics.subscribe();

        let outcome = executor
            .apply(Mutation::CreateGood {
                good: good_form().validate().unwrap(),
                created_by: "u1".into(),
            })
            .await;

        assert!(!outcome.is_success());
        let event = diagnostics.recv().await.unwrap();
        assert_eq!(event.path, "goods");
        assert_eq!(event.operation, OperationKind::Create);
        let payload = event.request_data.unwrap();
        assert_eq!(payload["totalValue"], 35.0);
    }

    #[tokio::test]
    async fn confirm_applies_only_on_exact_match() {
        let (executor, store) = executor_with_store();
        let path = DocPath::new("goods", "g1");
        store.insert(&path, Map::new());

        let mut guard = ConfirmationGuard::new();
        guard.open(Mutation::DeleteGood { item: path.clone() }, CodeLength::Four);
        let code = guard.code().unwrap().to_string();

        assert!(matches!(
            executor.confirm(&mut guard, &code[..3]).await,
            ConfirmResult::Rejected
        ));
        assert!(store.contains(&path));

        match executor.confirm(&mut guard, &code).await {
            ConfirmResult::Applied(outcome) => assert!(outcome.is_success()),
            other => panic!("expected Applied, got {other:?}"),
        }
        assert!(!store.contains(&path));

        // The dialog closed on match; replaying the code does nothing.
        assert!(matches!(
            executor.confirm(&mut guard, &code).await,
            ConfirmResult::NotOpen
        ));
    }
}
