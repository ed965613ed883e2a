use parking_lot::RwLock;
use sndcore::ac::role::*;
use std::collections::HashMap;

/// Priority assumed for roles absent from the hierarchy; less privileged
/// than any configured role.
pub const UNKNOWN_PRIORITY: u32 = 999;

const DEFAULT_HIERARCHY: &[(&str, u32)] = &[
    (SUPER_ADMIN, 1),
    (ADMIN, 2),
    (MANAGER, 3),
    (SUPERVISOR, 4),
    (OPERATOR, 5),
    (EMPLOYEE, 6),
    (USER, 7),
];

/// Total ordering of roles by numeric priority; a lower number is more
/// privileged.
#[derive(Debug)]
pub struct RoleHierarchy {
    top_role: RoleName,
    priorities: RwLock<HashMap<RoleName, u32>>,
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self {
            top_role: RoleName::from(SUPER_ADMIN),
            priorities: RwLock::new(HashMap::new()),
        }
    }
}

impl RoleHierarchy {
    pub fn builtin() -> Self {
        Self {
            priorities: RwLock::new(DEFAULT_HIERARCHY.iter()
                .map(|(role, priority)| (RoleName::from(*role), *priority))
                .collect()),
            .. Default::default()
        }
    }

    pub fn with_top_role(mut self, role: RoleName) -> Self {
        self.top_role = role;
        self
    }

    /// The role that may never be locked out when falling back.
    pub fn top_role(&self) -> &RoleName {
        &self.top_role
    }

    pub fn priority(&self, role: &RoleName) -> u32 {
        self.priorities.read()
            .get(role)
            .copied()
            .unwrap_or(UNKNOWN_PRIORITY)
    }

    /// Whether `candidate` is at least as privileged as the most
    /// privileged of `acceptable`.  With nothing to compare against the
    /// answer is false; callers treat an empty requirement as
    /// unrestricted before asking.
    pub fn is_at_least_as_privileged(
        &self,
        candidate: &RoleName,
        acceptable: &[RoleName],
    ) -> bool {
        let priorities = self.priorities.read();
        let lookup = |role: &RoleName| priorities.get(role)
            .copied()
            .unwrap_or(UNKNOWN_PRIORITY);
        acceptable.iter()
            .map(&lookup)
            .min()
            .is_some_and(|required| lookup(candidate) <= required)
    }

    /// The most privileged of the given roles, if any.
    pub fn highest_of<'a>(
        &self,
        roles: impl IntoIterator<Item = &'a RoleName>,
    ) -> Option<RoleName> {
        roles.into_iter()
            .min_by_key(|role| self.priority(role))
            .cloned()
    }

    pub fn contains(&self, role: &RoleName) -> bool {
        self.priorities.read().contains_key(role)
    }

    pub fn insert(&self, role: RoleName, priority: u32) -> Option<u32> {
        self.priorities.write().insert(role, priority)
    }

    pub fn remove(&self, role: &RoleName) -> Option<u32> {
        self.priorities.write().remove(role)
    }

    /// All known roles, most privileged first.
    pub fn roles(&self) -> Vec<(RoleName, u32)> {
        let mut roles = self.priorities.read()
            .iter()
            .map(|(role, priority)| (role.clone(), *priority))
            .collect::<Vec<_>>();
        roles.sort_by(|(ra, pa), (rb, pb)| pa.cmp(pb).then_with(|| ra.cmp(rb)));
        roles
    }
}
