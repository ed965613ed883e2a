use sndcore::ac::{
    role::RoleName,
    route::RoutePermission,
    traits::PolicyBackend,
};
use std::sync::Arc;

use crate::{
    Rbac,
    catalog::Catalog,
    error::Error,
    fallback::FallbackPolicy,
    hierarchy::RoleHierarchy,
    registry::{
        BaseRoutes,
        RouteRegistry,
    },
};

/// Builds the role-based access controller.
///
/// Methods can be chained in order to set the configuration values.
/// The `Rbac` is constructed by calling [`build`](Builder::build).
///
/// New instances of the builder can be obtained via `Builder::default`
/// or `Builder::new`.  The former provides empty role and route tables
/// while the latter seeds them with the built-in roles, fallback policy
/// and base routes.  Either way a policy backend must be supplied.
#[derive(Clone, Default)]
pub struct Builder {
    backend: Option<Arc<dyn PolicyBackend + Send + Sync>>,
    builtin: bool,
    catalog: Option<Catalog>,
    top_role: Option<RoleName>,
    roles: Vec<(RoleName, u32, Vec<String>)>,
    base_routes: Vec<(String, RoutePermission)>,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            builtin: true,
            .. Default::default()
        }
    }

    pub fn policy_backend(
        mut self,
        val: impl PolicyBackend + Send + Sync + 'static,
    ) -> Self {
        self.backend = Some(Arc::new(val));
        self
    }

    pub fn shared_policy_backend(
        mut self,
        val: Arc<dyn PolicyBackend + Send + Sync>,
    ) -> Self {
        self.backend = Some(val);
        self
    }

    pub fn catalog(mut self, val: Catalog) -> Self {
        self.catalog = Some(val);
        self
    }

    pub fn top_role(mut self, val: impl Into<RoleName>) -> Self {
        self.top_role = Some(val.into());
        self
    }

    /// Adds a role to both the hierarchy and the fallback policy.
    pub fn role(
        mut self,
        name: impl Into<RoleName>,
        priority: u32,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.roles.push((
            name.into(),
            priority,
            permissions.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn base_route(
        mut self,
        route: impl Into<String>,
        rule: RoutePermission,
    ) -> Self {
        self.base_routes.push((route.into(), rule));
        self
    }

    pub fn build(&self) -> Result<Rbac, Error> {
        let backend = self.backend
            .clone()
            .ok_or(Error::BackendRequired)?;
        let (hierarchy, fallback, mut base_routes) = if self.builtin {
            (RoleHierarchy::builtin(), FallbackPolicy::builtin(), BaseRoutes::builtin()?)
        } else {
            Default::default()
        };
        let hierarchy = match &self.top_role {
            Some(role) => hierarchy.with_top_role(role.clone()),
            None => hierarchy,
        };
        for (role, priority, permissions) in self.roles.iter() {
            hierarchy.insert(role.clone(), *priority);
            fallback.set(role.clone(), permissions.clone());
        }
        for (route, rule) in self.base_routes.iter() {
            base_routes.insert(route.clone(), rule.clone());
        }
        log::debug!(
            "new rbac set up with {} roles and {} base routes",
            hierarchy.roles().len(),
            base_routes.len(),
        );
        Ok(Rbac {
            backend,
            catalog: self.catalog.clone().unwrap_or_default(),
            fallback,
            hierarchy,
            base_routes,
            registry: RouteRegistry::new(),
        })
    }
}

#[cfg(test)]
mod test {
    use sndcore::ac::{
        permission::{Action, Subject},
        role::SUPER_ADMIN,
    };
    use test_snd::core::policy_store;
    use super::*;

    #[test]
    fn backend_required() {
        assert!(matches!(
            Builder::new().build(),
            Err(Error::BackendRequired),
        ));
    }

    #[test]
    fn builtin_tables() -> anyhow::Result<()> {
        let rbac = Builder::new()
            .policy_backend(policy_store(&[], &[]))
            .build()?;
        assert_eq!(rbac.hierarchy().top_role(), &RoleName::from(SUPER_ADMIN));
        assert_eq!(rbac.hierarchy().roles().len(), 7);
        assert_eq!(rbac.fallback().roles().len(), 7);
        assert!(rbac.base_routes().get("/dashboard").is_some());
        assert!(rbac.registry().is_empty());
        assert!(rbac.catalog().contains("read.Employee"));
        Ok(())
    }

    #[test]
    fn empty_tables() -> anyhow::Result<()> {
        let rbac = Builder::default()
            .policy_backend(policy_store(&[], &[]))
            .top_role("root")
            .role("root", 1, ["*"])
            .role("clerk", 5, ["read.ledger"])
            .base_route("/ledger", RoutePermission::new(
                Action::Read,
                Subject::new("Ledger")?,
                ["clerk"],
            ))
            .build()?;
        assert_eq!(rbac.hierarchy().top_role(), &RoleName::from("ROOT"));
        assert_eq!(rbac.hierarchy().priority(&"CLERK".into()), 5);
        assert_eq!(rbac.fallback().permissions_for(&"CLERK".into()), ["read.ledger"]);
        assert_eq!(rbac.base_routes().len(), 1);
        assert!(rbac.base_routes().get("/dashboard").is_none());
        Ok(())
    }
}
