//! Database row types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Status value for active rows; anything else is treated as inactive.
pub const STATUS_ACTIVE: i16 = 1;
/// Status value for soft-deleted rows.
pub const STATUS_INACTIVE: i16 = 0;

/// A stored definition of one invocable operation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Resource {
    /// Stored id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Category: "api" for invocable endpoints, "nav" for navigational
    /// entries.
    pub kind: String,
    /// Required HTTP method.
    pub api_method: String,
    /// Convention key: module.
    pub module: String,
    /// Convention key: controller.
    pub controller: String,
    /// Convention key: action.
    pub action: String,
    /// Active flag.
    pub status: i16,
    /// Creation timestamp.
    pub dt_created: DateTime<Utc>,
}

/// A condition attached to a resource describing who may invoke it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AccessRule {
    /// Stored id.
    pub id: Uuid,
    /// Owning resource.
    pub resource_id: Uuid,
    /// Level discriminator: 1 = role, 3 = owner, 2 reserved.
    pub level: i16,
    /// Role ids or a user id, per level.
    pub value: String,
    /// Active flag.
    pub status: i16,
}

/// A resource together with its attached access rules.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceWithRules {
    /// The resource definition.
    #[serde(flatten)]
    pub resource: Resource,
    /// All attached rules, active or not.
    pub rules: Vec<AccessRule>,
}

/// A user account row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    /// Account id.
    pub id: Uuid,
    /// Role id.
    pub role_id: String,
    /// E-mail address, usable as login.
    pub email: String,
    /// Mobile number, usable as login.
    pub mobile_no: Option<String>,
    /// Active flag (0 = soft-deleted).
    pub status: i16,
    /// Creation timestamp.
    pub dt_created: DateTime<Utc>,
    /// Last modification timestamp.
    pub dt_last_modified: Option<DateTime<Utc>>,
}

/// A user profile row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    /// Profile id.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Active flag.
    pub status: i16,
}

/// A stored credential. The value is an argon2 hash and never leaves the
/// repository layer.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredential {
    /// Credential id.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Credential type, e.g. "password".
    pub kind: String,
    /// Hashed credential value.
    pub value: String,
    /// Active flag.
    pub status: i16,
}

/// Credential metadata safe to return to clients.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CredentialSummary {
    /// Credential id.
    pub id: Uuid,
    /// Credential type.
    pub kind: String,
    /// Creation timestamp.
    pub dt_created: DateTime<Utc>,
}

/// A user role row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRole {
    /// Role id, e.g. "ADMIN".
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Active flag.
    pub status: i16,
}

/// A user with profile, role and credential metadata attached.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    /// The account row.
    #[serde(flatten)]
    pub user: User,
    /// Profile, when one exists.
    pub profile: Option<UserProfile>,
    /// Role definition.
    pub role: Option<UserRole>,
    /// Credential metadata (no secret values).
    pub credentials: Vec<CredentialSummary>,
}

/// A user with full credential rows, used only by the login flow.
#[derive(Debug, Clone)]
pub struct UserWithCredentials {
    /// The account row.
    pub user: User,
    /// Stored credentials including hashes.
    pub credentials: Vec<UserCredential>,
}
