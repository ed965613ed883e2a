//! Fallback policy
//!
//! The degraded-mode permission table consulted when the policy store
//! cannot be reached.  It must never be more permissive than the live
//! policy: roles only receive read and manage grants here, and `manage`
//! does not stand in for any other action.

use parking_lot::RwLock;
use sndcore::ac::{
    permission::{MANAGE_ALL, WILDCARD},
    role::*,
};
use std::collections::HashMap;

/// Role, subjects readable, subjects manageable (which are also
/// readable).  Subjects use their persisted spelling.
const DEFAULT_FALLBACK: &[(&str, &[&str], &[&str])] = &[
    (ADMIN, &[
        "dashboard",
    ], &[
        "user", "employee-data", "customer", "equipment", "rental",
        "quotation", "payroll", "timesheet", "project", "leave",
        "department", "designation", "report", "settings", "company",
        "safety", "employee-document", "salaryincrement",
    ]),
    (MANAGER, &[
        "dashboard", "user", "payroll", "department", "designation",
        "report", "settings", "company", "safety",
    ], &[
        "employee-data", "customer", "equipment", "rental", "quotation",
        "timesheet", "project", "leave", "employee-document",
        "salaryincrement",
    ]),
    (SUPERVISOR, &[
        "dashboard", "user", "customer", "equipment", "rental", "payroll",
        "department", "designation", "report", "settings", "company",
        "safety",
    ], &[
        "employee-data", "quotation", "timesheet", "project", "leave",
        "employee-document",
    ]),
    (OPERATOR, &[
        "dashboard", "user", "employee-data", "payroll", "leave",
        "department", "designation", "report", "settings", "company",
        "safety", "salaryincrement",
    ], &[
        "customer", "equipment", "rental", "quotation", "timesheet",
        "project", "employee-document",
    ]),
    (EMPLOYEE, &[
        "dashboard", "user", "employee-data", "customer", "equipment",
        "rental", "quotation", "payroll", "project", "department",
        "designation", "report", "settings", "company", "salaryincrement",
    ], &[
        "timesheet", "leave", "employee-document",
    ]),
    (USER, &[
        "dashboard", "user", "employee-data", "customer", "equipment",
        "rental", "quotation", "timesheet", "project", "leave",
        "department", "designation", "report", "settings", "company",
        "employee-document", "salaryincrement",
    ], &[]),
];

#[derive(Debug, Default)]
pub struct FallbackPolicy(RwLock<HashMap<RoleName, Vec<String>>>);

impl FallbackPolicy {
    /// The compiled-in table covering every built-in role.
    pub fn builtin() -> Self {
        let mut table = DEFAULT_FALLBACK.iter()
            .map(|(role, read, manage)| {
                let permissions = read.iter()
                    .chain(manage.iter())
                    .map(|subject| format!("read.{subject}"))
                    .chain(manage.iter().map(|subject| format!("manage.{subject}")))
                    .collect();
                (RoleName::from(*role), permissions)
            })
            .collect::<HashMap<_, _>>();
        table.insert(
            RoleName::from(SUPER_ADMIN),
            vec![WILDCARD.to_string(), MANAGE_ALL.to_string()],
        );
        Self(RwLock::new(table))
    }

    /// Permissions for the role; unknown roles receive none.
    pub fn permissions_for(&self, role: &RoleName) -> Vec<String> {
        self.0.read()
            .get(role)
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains(&self, role: &RoleName) -> bool {
        self.0.read().contains_key(role)
    }

    /// Inserts or replaces the permissions for the role.
    pub fn set(&self, role: RoleName, permissions: Vec<String>) {
        self.0.write().insert(role, permissions);
    }

    /// Replaces the permissions of an existing role.  Returns false and
    /// leaves the table untouched when the role is not present.
    pub fn update(&self, role: &RoleName, permissions: Vec<String>) -> bool {
        match self.0.write().get_mut(role) {
            Some(entry) => {
                *entry = permissions;
                true
            }
            None => {
                log::warn!("role {role} not in fallback policy; permissions not updated");
                false
            }
        }
    }

    pub fn remove(&self, role: &RoleName) -> Option<Vec<String>> {
        self.0.write().remove(role)
    }

    pub fn roles(&self) -> Vec<RoleName> {
        let mut roles = self.0.read()
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        roles.sort();
        roles
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builtin_table() {
        let policy = FallbackPolicy::builtin();
        assert_eq!(policy.roles().len(), 7);
        assert_eq!(
            policy.permissions_for(&SUPER_ADMIN.into()),
            ["*", "manage.all"],
        );
        let manager = policy.permissions_for(&MANAGER.into());
        assert!(manager.iter().any(|p| p == "manage.project"));
        assert!(manager.iter().any(|p| p == "read.project"));
        assert!(!manager.iter().any(|p| p.starts_with("delete.")));
        assert!(!manager.iter().any(|p| p == "manage.user"));
        // USER manages nothing
        assert!(policy.permissions_for(&USER.into())
            .iter()
            .all(|p| p.starts_with("read.")));
    }

    #[test]
    fn unknown_role_is_empty() {
        let policy = FallbackPolicy::builtin();
        assert!(policy.permissions_for(&"AUDITOR".into()).is_empty());
        assert!(FallbackPolicy::default().permissions_for(&ADMIN.into()).is_empty());
    }

    #[test]
    fn update_and_remove() {
        let policy = FallbackPolicy::default();
        assert!(!policy.update(&"AUDITOR".into(), vec!["read.report".into()]));
        assert!(!policy.contains(&"AUDITOR".into()));

        policy.set("auditor".into(), vec!["read.report".into()]);
        assert_eq!(policy.permissions_for(&"AUDITOR".into()), ["read.report"]);
        assert!(policy.update(&"AUDITOR".into(), vec!["export.report".into()]));
        assert_eq!(policy.permissions_for(&"Auditor".into()), ["export.report"]);

        assert!(policy.remove(&"AUDITOR".into()).is_some());
        assert!(policy.remove(&"AUDITOR".into()).is_none());
        assert!(policy.permissions_for(&"AUDITOR".into()).is_empty());
    }
}
