use serde::{Deserialize, Serialize};
use super::role::RoleName;

/// The authenticated actor making a request.
///
/// `role` is the primary role cached on the session.  It is only a hint
/// for the degraded path; the policy store remains the source of truth
/// for which roles the principal actually holds.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: RoleName,
    pub is_active: bool,
}

/// Roles and permissions the store reports for a given user.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct UserPermissions {
    pub user_id: String,
    pub roles: Vec<RoleName>,
    pub permissions: Vec<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: impl Into<RoleName>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            is_active: true,
            .. Default::default()
        }
    }
}
