//! Route permission tables
//!
//! Two sources describe how routes are guarded: the compiled-in
//! [`BaseRoutes`] and the [`RouteRegistry`] overlay which may be altered
//! while the process runs.  A registry entry shadows the base entry for
//! the same route; registry contents are not persisted.

use parking_lot::RwLock;
use sndcore::{
    ac::{
        permission::{Action, Subject},
        route::RoutePermission,
    },
    error::ValueError,
};
use std::collections::{BTreeMap, HashMap};

/// The default route table; no route carries a role restriction so the
/// permission check alone decides.
const DEFAULT_BASE_ROUTES: &[(&str, Action, &str)] = &[
    ("/dashboard", Action::Read, "Settings"),
    ("/employee-dashboard", Action::Read, "Employee"),
    ("/modules/employee-management", Action::Read, "Employee"),
    ("/modules/customer-management", Action::Read, "Customer"),
    ("/modules/equipment-management", Action::Read, "Equipment"),
    ("/modules/maintenance-management", Action::Read, "Maintenance"),
    ("/modules/company-management", Action::Read, "Company"),
    ("/modules/rental-management", Action::Read, "Rental"),
    ("/modules/quotation-management", Action::Read, "Quotation"),
    ("/modules/payroll-management", Action::Read, "Payroll"),
    ("/modules/timesheet-management", Action::Read, "Timesheet"),
    ("/modules/project-management", Action::Read, "Project"),
    ("/modules/leave-management", Action::Read, "Leave"),
    ("/modules/location-management", Action::Read, "Settings"),
    ("/modules/user-management", Action::Read, "User"),
    ("/modules/analytics", Action::Read, "Report"),
    ("/modules/safety-management", Action::Read, "Safety"),
    ("/modules/salary-increments", Action::Read, "SalaryIncrement"),
    ("/modules/reporting", Action::Read, "Report"),
    ("/modules/settings", Action::Read, "Settings"),
    ("/modules/audit-compliance", Action::Read, "Report"),
    ("/modules/document-management", Action::Read, "Document"),
    ("/admin", Action::Read, "Settings"),
    ("/reports", Action::Read, "Report"),
];

#[derive(Clone, Debug, Default)]
pub struct BaseRoutes(HashMap<String, RoutePermission>);

impl BaseRoutes {
    pub fn builtin() -> Result<Self, ValueError> {
        Self::try_from_table(DEFAULT_BASE_ROUTES)
    }

    /// Builds the table, failing on the first malformed subject.
    pub fn try_from_table(
        table: &[(&str, Action, &str)],
    ) -> Result<Self, ValueError> {
        table.iter()
            .map(|(route, action, subject)| Ok::<_, ValueError>((
                route.to_string(),
                RoutePermission::unrestricted(*action, Subject::new(*subject)?),
            )))
            .collect::<Result<HashMap<_, _>, _>>()
            .map(Self)
    }

    pub fn insert(&mut self, route: impl Into<String>, rule: RoutePermission) {
        self.0.insert(route.into(), rule);
    }

    pub fn get(&self, route: &str) -> Option<&RoutePermission> {
        self.0.get(route)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The dynamic overlay.  Writes replace the whole entry for a route;
/// the last registration wins.
#[derive(Debug, Default)]
pub struct RouteRegistry(RwLock<HashMap<String, RoutePermission>>);

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the rule for the route, returning the rule it replaced.
    pub fn register(
        &self,
        route: impl Into<String>,
        rule: RoutePermission,
    ) -> Option<RoutePermission> {
        let route = route.into();
        log::debug!(
            "registering route {route}: {}.{} for roles {:?}",
            rule.action,
            rule.subject,
            rule.roles,
        );
        self.0.write().insert(route, rule)
    }

    pub fn unregister(&self, route: &str) -> Option<RoutePermission> {
        let result = self.0.write().remove(route);
        if result.is_none() {
            log::warn!("route {route} has no registered permission to remove");
        }
        result
    }

    pub fn get(&self, route: &str) -> Option<RoutePermission> {
        self.0.read().get(route).cloned()
    }

    /// A snapshot of every registered rule, ordered by route.
    pub fn entries(&self) -> BTreeMap<String, RoutePermission> {
        self.0.read()
            .iter()
            .map(|(route, rule)| (route.clone(), rule.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }
}
