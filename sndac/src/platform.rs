use serde::Serialize;
use sndcore::{
    ac::{
        permission::{Action, Subject},
        principal::Principal,
        role::RoleName,
    },
    platform::ACPlatform,
};
use sndrbac::{
    Builder as RbacBuilder,
    Rbac,
};
use std::sync::Arc;

use crate::{
    api::{
        ApiPermission,
        Authorization,
        Denial,
    },
    error::Error,
};

#[derive(Default)]
pub struct Builder {
    ac_platform: Option<Arc<dyn ACPlatform>>,
    rbac_builder: RbacBuilder,
}

/// The access control platform: the policy store paired with the
/// authorization engine resolving against it.
pub struct Platform {
    ac_platform: Arc<dyn ACPlatform>,
    rbac: Rbac,
}

/// What the store knows about a user, plus the role that would be
/// cached on their session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserStatus {
    pub user_id: String,
    pub roles: Vec<RoleName>,
    pub permissions: Vec<String>,
    pub highest_role: RoleName,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            rbac_builder: RbacBuilder::new(),
            .. Default::default()
        }
    }

    pub fn ac_platform(mut self, val: impl ACPlatform + 'static) -> Self {
        self.ac_platform = Some(Arc::new(val));
        self
    }

    pub fn shared_ac_platform(mut self, val: Arc<dyn ACPlatform>) -> Self {
        self.ac_platform = Some(val);
        self
    }

    pub fn rbac_builder(mut self, val: RbacBuilder) -> Self {
        self.rbac_builder = val;
        self
    }

    pub fn build(self) -> Result<Arc<Platform>, Error> {
        let ac_platform = self.ac_platform
            .ok_or(Error::MissingPlatform)?;
        let rbac = self.rbac_builder
            .policy_backend(ac_platform.clone())
            .build()?;
        log::debug!("access control platform ready using {}", ac_platform.url());
        Ok(Arc::new(Platform {
            ac_platform,
            rbac,
        }))
    }
}

impl Platform {
    pub fn ac_platform(&self) -> &dyn ACPlatform {
        self.ac_platform.as_dyn()
    }

    pub fn rbac(&self) -> &Rbac {
        &self.rbac
    }
}

// Authorization.
impl Platform {
    pub async fn has_permission(
        &self,
        principal: &Principal,
        action: Action,
        subject: &Subject,
    ) -> bool {
        self.rbac.has_permission(principal, action, subject).await
    }

    pub async fn check_route(
        &self,
        principal: &Principal,
        route: &str,
    ) -> bool {
        self.rbac.check_route(principal, route).await
    }

    /// Decides whether an API handler guarded by `permission` may serve
    /// the principal.  The alternative permission, if any, is only
    /// checked when the primary one is not held.
    pub async fn check_api_permission(
        &self,
        principal: &Principal,
        permission: &ApiPermission,
    ) -> Authorization {
        if !principal.is_active {
            log::info!("denying api access to inactive user {:?}", principal.id);
            return Authorization::Denied(Denial::Inactive);
        }
        if self.rbac.has_permission(principal, permission.action, &permission.subject).await {
            return Authorization::Granted;
        }
        if let Some((action, subject)) = &permission.fallback {
            if self.rbac.has_permission(principal, *action, subject).await {
                return Authorization::Granted;
            }
        }
        Authorization::Denied(Denial::InsufficientPermissions)
    }

    pub async fn user_status(
        &self,
        principal: &Principal,
    ) -> Result<UserStatus, Error> {
        let permissions = self.rbac.user_permissions(principal).await?;
        let highest_role = self.rbac.highest_role(principal).await;
        Ok(UserStatus {
            user_id: permissions.user_id,
            roles: permissions.roles,
            permissions: permissions.permissions,
            highest_role,
        })
    }
}

// Role administration.
impl Platform {
    /// Creates the role in the store with the permissions attached.
    /// With a priority the role is also added to the hierarchy and the
    /// fallback policy of this platform.
    pub async fn create_role(
        &self,
        name: &RoleName,
        priority: Option<u32>,
        permissions: &[String],
    ) -> Result<i64, Error> {
        let id = self.ac_platform.add_role(name).await?;
        for permission in permissions {
            self.ac_platform.attach_permission_to_role(name, permission).await?;
        }
        if let Some(priority) = priority {
            self.rbac.add_role(name.clone(), priority, permissions.iter().cloned());
        }
        Ok(id)
    }

    pub async fn list_roles(&self) -> Result<Vec<RoleName>, Error> {
        Ok(self.ac_platform.list_roles().await?)
    }

    pub async fn grant_permission_to_role(
        &self,
        role: &RoleName,
        permission: &str,
    ) -> Result<bool, Error> {
        self.ensure_role(role).await?;
        Ok(self.ac_platform.attach_permission_to_role(role, permission).await?)
    }

    pub async fn revoke_permission_from_role(
        &self,
        role: &RoleName,
        permission: &str,
    ) -> Result<bool, Error> {
        Ok(self.ac_platform.detach_permission_from_role(role, permission).await?)
    }

    pub async fn grant_role_to_user(
        &self,
        user_id: i64,
        role: &RoleName,
    ) -> Result<bool, Error> {
        self.ensure_role(role).await?;
        Ok(self.ac_platform.assign_role_to_user(user_id, role).await?)
    }

    pub async fn revoke_role_from_user(
        &self,
        user_id: i64,
        role: &RoleName,
    ) -> Result<bool, Error> {
        Ok(self.ac_platform.revoke_role_from_user(user_id, role).await?)
    }

    async fn ensure_role(&self, role: &RoleName) -> Result<(), Error> {
        if self.ac_platform.list_roles().await?.contains(role) {
            Ok(())
        } else {
            Err(Error::UnknownRole(role.to_string()))
        }
    }
}
