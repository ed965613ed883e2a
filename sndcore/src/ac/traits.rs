use async_trait::async_trait;
use std::sync::Arc;
use crate::error::BackendError;
use super::role::RoleName;

/// The read side of the policy store that authorization depends on.
///
/// Neither method fails for "no data"; an error means the store could
/// not be consulted at all.
#[async_trait]
pub trait PolicyBackend {
    /// Roles assigned to the user.  A user id the store cannot interpret
    /// yields no roles rather than an error.
    async fn load_roles_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<RoleName>, BackendError>;
    /// The union of permission names attached to any of the roles, which
    /// may contain duplicates.  An empty `roles` must not hit the store.
    async fn load_permissions_for_roles(
        &self,
        roles: &[RoleName],
    ) -> Result<Vec<String>, BackendError>;
}

#[async_trait]
pub trait RoleBackend {
    async fn add_role(
        &self,
        name: &RoleName,
    ) -> Result<i64, BackendError>;
    async fn list_roles(
        &self,
    ) -> Result<Vec<RoleName>, BackendError>;
    async fn add_permission(
        &self,
        name: &str,
    ) -> Result<i64, BackendError>;
    async fn attach_permission_to_role(
        &self,
        role: &RoleName,
        permission: &str,
    ) -> Result<bool, BackendError>;
    async fn detach_permission_from_role(
        &self,
        role: &RoleName,
        permission: &str,
    ) -> Result<bool, BackendError>;
    async fn assign_role_to_user(
        &self,
        user_id: i64,
        role: &RoleName,
    ) -> Result<bool, BackendError>;
    async fn revoke_role_from_user(
        &self,
        user_id: i64,
        role: &RoleName,
    ) -> Result<bool, BackendError>;
}

#[async_trait]
impl<T: PolicyBackend + Send + Sync + ?Sized> PolicyBackend for Arc<T> {
    async fn load_roles_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<RoleName>, BackendError> {
        self.as_ref().load_roles_for_user(user_id).await
    }

    async fn load_permissions_for_roles(
        &self,
        roles: &[RoleName],
    ) -> Result<Vec<String>, BackendError> {
        self.as_ref().load_permissions_for_roles(roles).await
    }
}
