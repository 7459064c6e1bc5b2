//! Identity types carried through the request lifecycle.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role id that bypasses all rule evaluation.
pub const SUPER_ROLE: &str = "ADMIN";

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Role id of the subject.
    pub role_id: String,
    /// Additional role ids, if the subject holds more than one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Whether the account requires a second factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfa_required: Option<bool>,
    /// Whether the second factor has been presented.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfa_authenticated: Option<bool>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, expiring after `expires_in` seconds.
    pub fn new(user_id: Uuid, role_id: &str, expires_in: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            role_id: role_id.to_string(),
            roles: Vec::new(),
            tfa_required: None,
            tfa_authenticated: None,
            iat: now,
            exp: now + expires_in,
        }
    }

    /// Get user ID as UUID.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// Check if token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Check if the subject holds the super-role.
    pub fn is_super_role(&self) -> bool {
        self.role_id == SUPER_ROLE
    }
}

/// Authenticated user context, attached to the request after the gate
/// lets it through.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Subject id.
    pub id: Uuid,
    /// Role id.
    pub role_id: String,
    /// Full decoded claim set.
    pub claims: Claims,
}

impl AuthUser {
    /// Create from claims. Returns `None` when the subject id is not a
    /// well-formed UUID.
    pub fn from_claims(claims: Claims) -> Option<Self> {
        let id = claims.user_id()?;
        Some(Self {
            id,
            role_id: claims.role_id.clone(),
            claims,
        })
    }

    /// Check if the user holds the super-role.
    pub fn is_super_role(&self) -> bool {
        self.role_id == SUPER_ROLE
    }
}
