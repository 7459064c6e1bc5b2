//! Access rule evaluation.

use super::types::Claims;
use crate::db::models::{ResourceWithRules, STATUS_ACTIVE};

/// Rule level: `value` holds acceptable role ids.
pub const LEVEL_ROLE: i16 = 1;
/// Rule level: `value` is a specific user id.
///
/// Level 2 exists in stored data but has no assigned semantics; rules
/// carrying it never match.
pub const LEVEL_OWNER: i16 = 3;

/// Decide whether the identity may invoke the resource.
///
/// The super-role bypasses rule evaluation entirely. Otherwise the first
/// matching active rule grants access; a resource with no active rules is
/// denied to everyone.
pub fn has_access(claims: &Claims, resource: &ResourceWithRules) -> bool {
    if claims.is_super_role() {
        return true;
    }
    for rule in &resource.rules {
        if rule.status != STATUS_ACTIVE {
            continue;
        }
        match rule.level {
            LEVEL_ROLE if rule.value.contains(claims.role_id.as_str()) => return true,
            LEVEL_OWNER if rule.value == claims.sub => return true,
            _ => {}
        }
    }
    false
}
