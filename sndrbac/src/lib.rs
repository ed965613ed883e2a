//! Role-based access control (RBAC) for the SND platform.
//!
//! Given an authenticated [`Principal`](sndcore::ac::principal::Principal),
//! an [`Rbac`] decides whether that principal may perform an action on a
//! subject, and whether it may reach a given route.  Roles and permissions
//! are resolved from the policy store on every call; should the store
//! fail, the decision is made from the compiled-in fallback policy keyed
//! by the principal's cached role instead.  Every decision is a plain
//! `bool` and store failures are only ever logged.
//!
//! An `Rbac` is constructed through the [`Builder`] and is meant to be
//! shared (e.g. behind an `Arc`) by everything serving requests; the
//! tables that may be changed at runtime are internally synchronized.

use sndcore::ac::traits::PolicyBackend;
use std::sync::Arc;

pub mod builder;
pub mod catalog;
pub mod error;
pub mod fallback;
pub mod hierarchy;
pub mod registry;
mod provision;
mod resolver;

pub use crate::{
    builder::Builder,
    resolver::PermissionSet,
};
use crate::{
    catalog::Catalog,
    fallback::FallbackPolicy,
    hierarchy::RoleHierarchy,
    registry::{
        BaseRoutes,
        RouteRegistry,
    },
};

pub struct Rbac {
    backend: Arc<dyn PolicyBackend + Send + Sync>,
    catalog: Catalog,
    fallback: FallbackPolicy,
    hierarchy: RoleHierarchy,
    base_routes: BaseRoutes,
    registry: RouteRegistry,
}

impl Rbac {
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn fallback(&self) -> &FallbackPolicy {
        &self.fallback
    }

    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    pub fn base_routes(&self) -> &BaseRoutes {
        &self.base_routes
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }
}
