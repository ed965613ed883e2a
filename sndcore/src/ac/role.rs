use serde::{Deserialize, Serialize};

pub const SUPER_ADMIN: &str = "SUPER_ADMIN";
pub const ADMIN: &str = "ADMIN";
pub const MANAGER: &str = "MANAGER";
pub const SUPERVISOR: &str = "SUPERVISOR";
pub const OPERATOR: &str = "OPERATOR";
pub const EMPLOYEE: &str = "EMPLOYEE";
pub const USER: &str = "USER";

/// The name of a role.
///
/// Role names are case-folded to upper case and trimmed whenever they
/// enter the system, so `"admin"`, `" Admin"` and `"ADMIN"` all name the
/// same role.  The default is the least privileged built-in role `USER`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub struct RoleName(String);

mod impls;
