use sndcore::{
    ac::{
        permission::{
            is_wildcard,
            Action,
            PermissionName,
            Subject,
        },
        principal::{
            Principal,
            UserPermissions,
        },
        role::RoleName,
        route::RoutePermission,
    },
    error::BackendError,
};
use std::collections::HashSet;

use crate::{
    Rbac,
    catalog::Catalog,
};

/// Permission names held by a principal.  Duplicates reported by the
/// store collapse here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PermissionSet(HashSet<String>);

impl FromIterator<String> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl PermissionSet {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a wildcard grant is held.
    pub fn is_unrestricted(&self) -> bool {
        self.0.iter().any(|name| is_wildcard(name))
    }

    /// Whether the set satisfies `<action>.<subject>` after expansion
    /// through the catalog.
    pub fn grants(
        &self,
        catalog: &Catalog,
        action: Action,
        subject: &Subject,
    ) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        let name = PermissionName::new(action, subject);
        catalog.expand(name.as_str())
            .into_iter()
            .any(|persisted| self.0.contains(persisted))
    }
}

impl Rbac {
    /// The permissions the store currently attaches to the principal.
    /// A principal without roles holds nothing and the permission lookup
    /// is skipped.
    pub async fn live_permissions(
        &self,
        principal: &Principal,
    ) -> Result<PermissionSet, BackendError> {
        let roles = self.backend.load_roles_for_user(&principal.id).await?;
        if roles.is_empty() {
            log::trace!("user {:?} holds no roles", principal.id);
            return Ok(PermissionSet::default());
        }
        Ok(self.backend
            .load_permissions_for_roles(&roles)
            .await?
            .into_iter()
            .collect())
    }

    /// The permissions the fallback policy grants for the role.
    pub fn fallback_permissions(&self, role: &RoleName) -> PermissionSet {
        self.fallback.permissions_for(role)
            .into_iter()
            .collect()
    }

    /// Validates if the principal may perform `action` on `subject`.
    ///
    /// Never fails: should the store be unavailable the decision is made
    /// using the fallback policy for the principal's cached role, under
    /// which the top role is always permitted.
    pub async fn has_permission(
        &self,
        principal: &Principal,
        action: Action,
        subject: &Subject,
    ) -> bool {
        let permit = match self.live_permissions(principal).await {
            Ok(permissions) => permissions.grants(&self.catalog, action, subject),
            Err(e) => {
                log::error!(
                    "unable to load permissions for user {:?}, applying fallback \
                    policy for role {}: {e}",
                    principal.id,
                    principal.role,
                );
                self.fallback_grants(principal, action, subject)
            }
        };
        log::trace!("user {:?} {action}.{subject}: {permit}", principal.id);
        permit
    }

    fn fallback_grants(
        &self,
        principal: &Principal,
        action: Action,
        subject: &Subject,
    ) -> bool {
        if &principal.role == self.hierarchy.top_role() {
            return true;
        }
        self.fallback_permissions(&principal.role)
            .grants(&self.catalog, action, subject)
    }

    /// Every grantable action the principal may perform on the subject.
    /// Resolves against the store once for all actions.
    pub async fn allowed_actions(
        &self,
        principal: &Principal,
        subject: &Subject,
    ) -> Vec<Action> {
        let live = self.live_permissions(principal).await;
        if let Err(e) = &live {
            log::error!(
                "unable to load permissions for user {:?}, listing actions from \
                fallback policy for role {}: {e}",
                principal.id,
                principal.role,
            );
        }
        Action::GRANTABLE.into_iter()
            .filter(|action| match &live {
                Ok(permissions) => permissions.grants(&self.catalog, *action, subject),
                Err(_) => self.fallback_grants(principal, *action, subject),
            })
            .collect()
    }

    /// The most privileged role the store assigns to the principal,
    /// never less privileged than the default `USER` role.
    pub async fn highest_role(&self, principal: &Principal) -> RoleName {
        let default = RoleName::default();
        match self.backend.load_roles_for_user(&principal.id).await {
            Ok(roles) => self.hierarchy
                .highest_of(roles.iter().chain([&default]))
                .unwrap_or(default),
            Err(e) => {
                log::error!("unable to load roles for user {:?}: {e}", principal.id);
                default
            }
        }
    }

    /// Roles and permissions as reported by the store, without fallback.
    pub async fn user_permissions(
        &self,
        principal: &Principal,
    ) -> Result<UserPermissions, BackendError> {
        let roles = self.backend.load_roles_for_user(&principal.id).await?;
        let permissions = self.backend.load_permissions_for_roles(&roles).await?;
        Ok(UserPermissions {
            user_id: principal.id.clone(),
            roles,
            permissions,
        })
    }

    /// The rule guarding the route; a registered rule shadows the base
    /// table.
    pub fn route_permission(&self, route: &str) -> Option<RoutePermission> {
        self.registry.get(route)
            .or_else(|| self.base_routes.get(route).cloned())
    }

    /// Validates if the principal may reach the route.
    ///
    /// Routes without a rule are open.  Otherwise a role restricted rule
    /// first requires the principal's role be at least as privileged as
    /// the listed roles, then the permission of the rule is checked.
    pub async fn check_route(
        &self,
        principal: &Principal,
        route: &str,
    ) -> bool {
        let Some(rule) = self.route_permission(route) else {
            log::trace!("route {route} has no rule; allowing");
            return true;
        };
        if rule.is_role_restricted()
            && !self.hierarchy.is_at_least_as_privileged(&principal.role, &rule.roles)
        {
            log::trace!(
                "role {} of user {:?} insufficient for route {route}",
                principal.role,
                principal.id,
            );
            return false;
        }
        self.has_permission(principal, rule.action, &rule.subject).await
    }

    pub fn register_route(
        &self,
        route: impl Into<String>,
        action: Action,
        subject: Subject,
        roles: Vec<RoleName>,
    ) -> Option<RoutePermission> {
        self.registry.register(route, RoutePermission { action, subject, roles })
    }

    pub fn unregister_route(&self, route: &str) -> Option<RoutePermission> {
        self.registry.unregister(route)
    }
}

#[cfg(test)]
mod test {
    use sndcore::ac::role::*;
    use test_snd::core::{
        failing_policy_store,
        policy_store,
        MockStore,
    };
    use crate::Builder;
    use super::*;

    fn subject(s: &str) -> Subject {
        Subject::new(s).expect("valid subject")
    }

    fn build_rbac(store: MockStore) -> anyhow::Result<Rbac> {
        Ok(Builder::new().policy_backend(store).build()?)
    }

    #[test]
    fn unrestricted_permission_sets() -> anyhow::Result<()> {
        let catalog = Catalog::default();
        for wildcard in ["*", "manage.all"] {
            let set = [wildcard.to_string()].into_iter().collect::<PermissionSet>();
            assert!(set.is_unrestricted());
            assert!(set.grants(&catalog, Action::Reset, &subject("Anything")));
        }
        let set = ["manage.All".to_string()].into_iter().collect::<PermissionSet>();
        assert!(!set.is_unrestricted());
        assert!(!set.grants(&catalog, Action::Read, &subject("All")));
        Ok(())
    }

    #[tokio::test]
    async fn no_roles_denies_everything() -> anyhow::Result<()> {
        let mut store = MockStore::new();
        store.expect_load_roles_for_user()
            .returning(|_| Ok(vec![]));
        store.expect_load_permissions_for_roles()
            .never();
        let rbac = build_rbac(store)?;
        // cached role is not consulted while the store answers
        let principal = Principal::new("1", SUPER_ADMIN);
        for action in Action::ALL {
            assert!(!rbac.has_permission(&principal, action, &subject("Employee")).await);
        }
        assert!(!rbac.has_permission(&principal, Action::Manage, &subject("all")).await);
        Ok(())
    }

    #[tokio::test]
    async fn wildcards_allow_everything() -> anyhow::Result<()> {
        for wildcard in ["*", "manage.all"] {
            let rbac = build_rbac(policy_store(&["CUSTOM"], &["read.report", wildcard]))?;
            let principal = Principal::new("1", USER);
            for action in Action::ALL {
                assert!(rbac.has_permission(&principal, action, &subject("Payroll")).await);
                assert!(rbac.has_permission(&principal, action, &subject("Uncataloged")).await);
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn catalog_expansion() -> anyhow::Result<()> {
        let principal = Principal::new("7", USER);
        let rbac = build_rbac(policy_store(&[EMPLOYEE], &["read.employee-data"]))?;
        assert!(rbac.has_permission(&principal, Action::Read, &subject("Employee")).await);
        assert!(!rbac.has_permission(&principal, Action::Update, &subject("Employee")).await);

        let rbac = build_rbac(policy_store(&[EMPLOYEE], &["read.Equipment"]))?;
        assert!(rbac.has_permission(&principal, Action::Read, &subject("Equipment")).await);
        let rbac = build_rbac(policy_store(&[EMPLOYEE], &["read.equipment"]))?;
        assert!(rbac.has_permission(&principal, Action::Read, &subject("Equipment")).await);
        let rbac = build_rbac(policy_store(&[EMPLOYEE], &["read.customer"]))?;
        assert!(!rbac.has_permission(&principal, Action::Read, &subject("Equipment")).await);

        // uncataloged names are checked literally
        let rbac = build_rbac(policy_store(&[EMPLOYEE], &["sync.Customer"]))?;
        assert!(rbac.has_permission(&principal, Action::Sync, &subject("Customer")).await);
        assert!(!rbac.has_permission(&principal, Action::Sync, &subject("customer")).await);
        // manage does not imply the other verbs
        let rbac = build_rbac(policy_store(&[EMPLOYEE], &["manage.project"]))?;
        assert!(rbac.has_permission(&principal, Action::Manage, &subject("Project")).await);
        assert!(!rbac.has_permission(&principal, Action::Delete, &subject("Project")).await);
        Ok(())
    }

    #[tokio::test]
    async fn roles_passed_to_permission_lookup() -> anyhow::Result<()> {
        let mut store = MockStore::new();
        store.expect_load_roles_for_user()
            .withf(|id| id == "42")
            .times(1)
            .returning(|_| Ok(vec!["manager".into(), "EMPLOYEE".into()]));
        store.expect_load_permissions_for_roles()
            .withf(|roles| roles == [RoleName::from(MANAGER), RoleName::from(EMPLOYEE)])
            .times(1)
            .returning(|_| Ok(vec!["read.report".into(), "read.report".into()]));
        let rbac = build_rbac(store)?;
        assert!(rbac.has_permission(&Principal::new("42", USER), Action::Read, &subject("Report")).await);
        Ok(())
    }

    #[tokio::test]
    async fn top_role_survives_store_failure() -> anyhow::Result<()> {
        let rbac = Builder::new()
            .policy_backend(failing_policy_store())
            .build()?;
        // even with an emptied fallback entry
        rbac.fallback().remove(&SUPER_ADMIN.into());
        let principal = Principal::new("1", "super_admin");
        for action in Action::ALL {
            assert!(rbac.has_permission(&principal, action, &subject("User")).await);
        }
        Ok(())
    }

    #[tokio::test]
    async fn fallback_for_manager() -> anyhow::Result<()> {
        let rbac = build_rbac(failing_policy_store())?;
        let principal = Principal::new("3", MANAGER);
        assert!(rbac.has_permission(&principal, Action::Manage, &subject("Project")).await);
        assert!(rbac.has_permission(&principal, Action::Read, &subject("Employee")).await);
        assert!(!rbac.has_permission(&principal, Action::Delete, &subject("User")).await);
        assert!(!rbac.has_permission(&principal, Action::Manage, &subject("Company")).await);
        Ok(())
    }

    #[tokio::test]
    async fn fallback_for_unknown_role() -> anyhow::Result<()> {
        let rbac = build_rbac(failing_policy_store())?;
        let principal = Principal::new("3", "CONTRACTOR");
        for action in Action::ALL {
            assert!(!rbac.has_permission(&principal, action, &subject("Report")).await);
        }
        Ok(())
    }

    #[tokio::test]
    async fn failure_on_second_lookup_falls_back() -> anyhow::Result<()> {
        let mut store = MockStore::new();
        store.expect_load_roles_for_user()
            .returning(|_| Ok(vec![MANAGER.into()]));
        store.expect_load_permissions_for_roles()
            .returning(|_| Err(BackendError::Unavailable("timed out".into())));
        let rbac = build_rbac(store)?;
        let principal = Principal::new("3", EMPLOYEE);
        // EMPLOYEE fallback reads projects but does not manage them
        assert!(rbac.has_permission(&principal, Action::Read, &subject("Project")).await);
        assert!(!rbac.has_permission(&principal, Action::Manage, &subject("Project")).await);
        Ok(())
    }

    #[tokio::test]
    async fn allowed_actions() -> anyhow::Result<()> {
        let rbac = build_rbac(policy_store(
            &[OPERATOR],
            &["read.timesheet", "approve.timesheet", "manage.timesheet"],
        ))?;
        let principal = Principal::new("9", OPERATOR);
        assert_eq!(
            rbac.allowed_actions(&principal, &subject("Timesheet")).await,
            [Action::Read, Action::Approve],
        );

        let rbac = build_rbac(failing_policy_store())?;
        assert_eq!(
            rbac.allowed_actions(&Principal::new("1", SUPER_ADMIN), &subject("Timesheet")).await,
            Action::GRANTABLE,
        );
        assert_eq!(
            rbac.allowed_actions(&Principal::new("2", USER), &subject("Timesheet")).await,
            [Action::Read],
        );
        Ok(())
    }

    #[tokio::test]
    async fn highest_role() -> anyhow::Result<()> {
        let principal = Principal::new("5", USER);
        let rbac = build_rbac(policy_store(&[EMPLOYEE, "admin", OPERATOR], &[]))?;
        assert_eq!(rbac.highest_role(&principal).await, ADMIN);
        let rbac = build_rbac(policy_store(&["AUDITOR"], &[]))?;
        assert_eq!(rbac.highest_role(&principal).await, USER);
        let rbac = build_rbac(policy_store(&[], &[]))?;
        assert_eq!(rbac.highest_role(&principal).await, USER);
        let rbac = build_rbac(failing_policy_store())?;
        assert_eq!(rbac.highest_role(&principal).await, USER);
        Ok(())
    }

    #[tokio::test]
    async fn user_permissions() -> anyhow::Result<()> {
        let rbac = build_rbac(policy_store(&[SUPERVISOR], &["read.report"]))?;
        let result = rbac.user_permissions(&Principal::new("5", USER)).await?;
        assert_eq!(result.user_id, "5");
        assert_eq!(result.roles, [RoleName::from(SUPERVISOR)]);
        assert_eq!(result.permissions, ["read.report"]);

        let rbac = build_rbac(failing_policy_store())?;
        assert!(rbac.user_permissions(&Principal::new("5", USER)).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn unlisted_route_allowed() -> anyhow::Result<()> {
        let rbac = build_rbac(policy_store(&[], &[]))?;
        assert!(rbac.check_route(&Principal::new("1", USER), "/modules/nowhere").await);
        Ok(())
    }

    #[tokio::test]
    async fn base_route_uses_permission_only() -> anyhow::Result<()> {
        let rbac = build_rbac(policy_store(&[USER], &["read.report"]))?;
        // an unknown cached role does not matter for unrestricted routes
        let principal = Principal::new("1", "NOBODY");
        assert!(rbac.check_route(&principal, "/reports").await);
        assert!(!rbac.check_route(&principal, "/modules/payroll-management").await);
        Ok(())
    }

    #[tokio::test]
    async fn dynamic_route_precedence() -> anyhow::Result<()> {
        let rbac = build_rbac(policy_store(&["ROLE1"], &["read.X", "manage.Y"]))?;
        rbac.hierarchy().insert("ROLE1".into(), 10);
        rbac.hierarchy().insert("ROLE2".into(), 5);
        let principal = Principal::new("1", "ROLE1");

        rbac.register_route("/r", Action::Read, subject("X"), vec!["ROLE1".into()]);
        assert!(rbac.check_route(&principal, "/r").await);
        rbac.register_route("/r", Action::Manage, subject("Y"), vec!["ROLE2".into()]);
        assert!(!rbac.check_route(&principal, "/r").await);
        assert!(rbac.check_route(&Principal::new("2", "ROLE2"), "/r").await);

        assert!(rbac.unregister_route("/r").is_some());
        assert!(rbac.check_route(&principal, "/r").await);
        Ok(())
    }

    #[tokio::test]
    async fn dynamic_route_shadows_base() -> anyhow::Result<()> {
        let rbac = build_rbac(policy_store(&[EMPLOYEE], &["read.report"]))?;
        let principal = Principal::new("1", EMPLOYEE);
        assert!(rbac.check_route(&principal, "/reports").await);
        rbac.register_route("/reports", Action::Read, subject("Report"), vec![MANAGER.into()]);
        assert!(!rbac.check_route(&principal, "/reports").await);
        rbac.unregister_route("/reports");
        assert!(rbac.check_route(&principal, "/reports").await);
        Ok(())
    }

    #[tokio::test]
    async fn route_check_under_store_failure() -> anyhow::Result<()> {
        let rbac = build_rbac(failing_policy_store())?;
        assert!(rbac.check_route(&Principal::new("1", SUPER_ADMIN), "/admin").await);
        assert!(rbac.check_route(&Principal::new("1", EMPLOYEE), "/modules/project-management").await);
        assert!(!rbac.check_route(&Principal::new("1", EMPLOYEE), "/modules/maintenance-management").await);
        Ok(())
    }
}
