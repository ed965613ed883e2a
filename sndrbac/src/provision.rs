use sndcore::ac::{
    permission::{Action, Subject},
    role::RoleName,
    route::RoutePermission,
};

use crate::{
    Rbac,
    error::Error,
};

/// Permission name fragments and the routes holding any permission
/// containing one of them implies.  Matching is case insensitive.
const ROUTE_ASSOCIATIONS: &[(&[&str], &[(&str, Action, &str)])] = &[
    (&["employee-data"], &[
        ("/modules/employee-management", Action::Read, "Employee"),
    ]),
    (&["customer"], &[
        ("/modules/customer-management", Action::Read, "Customer"),
    ]),
    (&["equipment"], &[
        ("/modules/equipment-management", Action::Read, "Equipment"),
    ]),
    (&["project"], &[
        ("/modules/project-management", Action::Read, "Project"),
    ]),
    (&["timesheet"], &[
        ("/modules/timesheet-management", Action::Read, "Timesheet"),
    ]),
    (&["report"], &[
        ("/modules/analytics", Action::Read, "Report"),
        ("/modules/reporting", Action::Read, "Report"),
        ("/reports", Action::Read, "Report"),
    ]),
    (&["settings", "system-setting"], &[
        ("/modules/settings", Action::Read, "Settings"),
    ]),
    (&["quotation"], &[
        ("/modules/quotation-management", Action::Read, "Quotation"),
    ]),
    (&["leave"], &[
        ("/modules/leave-management", Action::Read, "Leave"),
    ]),
    (&["payroll"], &[
        ("/modules/payroll-management", Action::Read, "Payroll"),
    ]),
    (&["salaryincrement"], &[
        ("/modules/salary-increments", Action::Read, "SalaryIncrement"),
    ]),
    (&["safety"], &[
        ("/modules/safety-management", Action::Read, "Safety"),
    ]),
];

/// Granted to every role holding at least one permission.
const DASHBOARD: (&str, Action, &str) = ("/dashboard", Action::Read, "Settings");

impl Rbac {
    /// Records a role in the hierarchy and the fallback policy.  Neither
    /// table is persisted; roles added here last for the lifetime of this
    /// `Rbac`.
    pub fn add_role(
        &self,
        name: impl Into<RoleName>,
        priority: u32,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) {
        let name = name.into();
        let permissions = permissions.into_iter()
            .map(Into::into)
            .collect::<Vec<String>>();
        log::info!(
            "adding role {name} with priority {priority} and {} permission(s)",
            permissions.len(),
        );
        self.hierarchy.insert(name.clone(), priority);
        self.fallback.set(name, permissions);
    }

    /// Registers route rules restricted to `role` for every route its
    /// fallback permissions suggest it should reach, returning the routes
    /// registered.  Existing registrations for those routes are replaced.
    ///
    /// This is a convenience for bootstrapping new roles and offers no
    /// guarantee of complete or minimal coverage; the permission check
    /// made for each route remains authoritative.
    pub fn auto_grant_route_access(
        &self,
        role: &RoleName,
    ) -> Result<Vec<String>, Error> {
        if !self.fallback.contains(role) {
            log::warn!("role {role} not found; cannot auto-grant route access");
            return Ok(Vec::new());
        }
        let permissions = self.fallback.permissions_for(role)
            .into_iter()
            .map(|name| name.to_lowercase())
            .collect::<Vec<_>>();
        let matched = ROUTE_ASSOCIATIONS.iter()
            .filter(|(fragments, _)| fragments.iter()
                .any(|fragment| permissions.iter()
                    .any(|name| name.contains(fragment))
                )
            )
            .flat_map(|(_, routes)| routes.iter());
        let dashboard = (!permissions.is_empty()).then_some(&DASHBOARD);

        let mut granted = Vec::new();
        for (route, action, subject) in matched.chain(dashboard) {
            let rule = RoutePermission {
                action: *action,
                subject: Subject::new(*subject)?,
                roles: vec![role.clone()],
            };
            self.registry.register(*route, rule);
            granted.push(route.to_string());
        }
        log::info!("auto-granted route access for role {role}: {granted:?}");
        Ok(granted)
    }

    /// [`add_role`](Rbac::add_role) followed by
    /// [`auto_grant_route_access`](Rbac::auto_grant_route_access).
    pub fn add_role_with_route_access(
        &self,
        name: impl Into<RoleName>,
        priority: u32,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Vec<String>, Error> {
        let name = name.into();
        self.add_role(name.clone(), priority, permissions);
        self.auto_grant_route_access(&name)
    }

    /// Drops the role from the hierarchy and the fallback policy.  Route
    /// registrations naming the role are left as is.
    pub fn remove_role(&self, name: &RoleName) -> bool {
        let in_hierarchy = self.hierarchy.remove(name).is_some();
        let in_fallback = self.fallback.remove(name).is_some();
        if in_hierarchy || in_fallback {
            log::info!("removed role {name}");
            true
        } else {
            log::warn!("role {name} not found; nothing removed");
            false
        }
    }

    /// Replaces the fallback permissions of an existing role.
    pub fn update_role_permissions(
        &self,
        name: &RoleName,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> bool {
        self.fallback.update(
            name,
            permissions.into_iter().map(Into::into).collect(),
        )
    }
}

#[cfg(test)]
mod test {
    use sndcore::ac::{
        principal::Principal,
        role::*,
    };
    use test_snd::core::{
        failing_policy_store,
        policy_store,
    };
    use crate::{
        Builder,
        hierarchy::UNKNOWN_PRIORITY,
    };
    use super::*;

    #[tokio::test]
    async fn auditor_reaches_analytics() -> anyhow::Result<()> {
        let rbac = Builder::new()
            .policy_backend(failing_policy_store())
            .build()?;
        rbac.add_role("AUDITOR", 4, ["read.report"]);
        let granted = rbac.auto_grant_route_access(&"auditor".into())?;
        assert_eq!(granted, [
            "/modules/analytics",
            "/modules/reporting",
            "/reports",
            "/dashboard",
        ]);
        let auditor = Principal::new("11", "AUDITOR");
        assert!(rbac.check_route(&auditor, "/modules/analytics").await);
        assert!(rbac.check_route(&auditor, "/reports").await);
        // dashboard requires read.Settings, which the auditor lacks
        assert!(!rbac.check_route(&auditor, "/dashboard").await);
        assert!(!rbac.check_route(&auditor, "/modules/payroll-management").await);
        // the registration now restricts the route to AUDITOR and above
        let employee = Principal::new("12", EMPLOYEE);
        assert!(!rbac.check_route(&employee, "/modules/analytics").await);
        let admin = Principal::new("13", ADMIN);
        assert!(rbac.check_route(&admin, "/modules/analytics").await);
        Ok(())
    }

    #[tokio::test]
    async fn auditor_with_live_store() -> anyhow::Result<()> {
        let rbac = Builder::new()
            .policy_backend(policy_store(&["AUDITOR"], &["read.report"]))
            .build()?;
        rbac.add_role_with_route_access("AUDITOR", 4, ["read.report"])?;
        assert!(rbac.check_route(&Principal::new("11", "AUDITOR"), "/modules/analytics").await);
        Ok(())
    }

    #[test]
    fn route_associations() -> anyhow::Result<()> {
        let rbac = Builder::new()
            .policy_backend(policy_store(&[], &[]))
            .build()?;
        rbac.add_role("CLERK", 6, [
            "read.Employee-Data",
            "manage.system-setting",
            "approve.timesheet",
        ]);
        let mut granted = rbac.auto_grant_route_access(&"CLERK".into())?;
        granted.sort();
        assert_eq!(granted, [
            "/dashboard",
            "/modules/employee-management",
            "/modules/settings",
            "/modules/timesheet-management",
        ]);
        let rule = rbac.registry().get("/modules/settings")
            .expect("registered");
        assert_eq!(rule.action, Action::Read);
        assert_eq!(rule.subject.as_str(), "Settings");
        assert_eq!(rule.roles, [RoleName::from("CLERK")]);
        Ok(())
    }

    #[test]
    fn no_permissions_no_routes() -> anyhow::Result<()> {
        let rbac = Builder::new()
            .policy_backend(policy_store(&[], &[]))
            .build()?;
        rbac.add_role("GUEST", 8, Vec::<String>::new());
        assert!(rbac.auto_grant_route_access(&"GUEST".into())?.is_empty());
        assert!(rbac.registry().is_empty());
        // unknown role
        assert!(rbac.auto_grant_route_access(&"NOBODY".into())?.is_empty());
        Ok(())
    }

    #[test]
    fn remove_and_update() -> anyhow::Result<()> {
        let rbac = Builder::new()
            .policy_backend(policy_store(&[], &[]))
            .build()?;
        assert!(!rbac.update_role_permissions(&"AUDITOR".into(), ["read.report"]));
        assert!(!rbac.fallback().contains(&"AUDITOR".into()));

        rbac.add_role("auditor", 4, ["read.report"]);
        assert_eq!(rbac.hierarchy().priority(&"AUDITOR".into()), 4);
        assert!(rbac.update_role_permissions(&"AUDITOR".into(), ["read.report", "export.report"]));
        assert_eq!(
            rbac.fallback().permissions_for(&"AUDITOR".into()),
            ["read.report", "export.report"],
        );

        assert!(rbac.remove_role(&"AUDITOR".into()));
        assert!(!rbac.remove_role(&"AUDITOR".into()));
        assert_eq!(rbac.hierarchy().priority(&"AUDITOR".into()), UNKNOWN_PRIORITY);
        assert!(rbac.fallback().permissions_for(&"AUDITOR".into()).is_empty());
        Ok(())
    }
}
