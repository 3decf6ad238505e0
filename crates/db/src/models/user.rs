use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::store::DocPath;

pub const USERS_COLLECTION: &str = "users";

/// Ordered privilege tiers. Declaration order is the privilege order, lowest
/// first, so `role >= UserRole::Admin` reads as "admin or above".
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    TS,
    EnumString,
    Display,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    #[default]
    Pending,
    Verified,
    Admin,
    // Wire string is camel-case in the deployed dashboard's user documents.
    #[serde(rename = "SysAdmin")]
    #[strum(serialize = "SysAdmin")]
    SysAdmin,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

/// Operator account mirrored from the auth provider into the store.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct User {
    /// Stable identifier issued by the auth provider.
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// New registrations start at the lowest tier and must be approved.
    pub fn register(id: String, email: Option<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email,
            display_name,
            role: UserRole::Pending,
            status: UserStatus::Active,
            created_at: Utc::now(),
        }
    }

    pub fn path(&self) -> DocPath {
        DocPath::new(USERS_COLLECTION, self.id.clone())
    }
}
