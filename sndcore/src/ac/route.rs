use serde::{Deserialize, Serialize};
use super::{
    permission::{Action, Subject},
    role::RoleName,
};

/// The access rule guarding a route.
///
/// An empty `roles` list places no role restriction on the route; the
/// permission check alone governs access.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RoutePermission {
    pub action: Action,
    pub subject: Subject,
    pub roles: Vec<RoleName>,
}

impl RoutePermission {
    pub fn new(
        action: Action,
        subject: Subject,
        roles: impl IntoIterator<Item = impl Into<RoleName>>,
    ) -> Self {
        Self {
            action,
            subject,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// A rule with no role restriction.
    pub fn unrestricted(action: Action, subject: Subject) -> Self {
        Self {
            action,
            subject,
            roles: Vec::new(),
        }
    }

    pub fn is_role_restricted(&self) -> bool {
        !self.roles.is_empty()
    }
}
