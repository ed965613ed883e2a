//! Permission tokens
//!
//! A permission is a string token of the form `<action>.<subject>`.  The
//! action is drawn from a closed vocabulary while the subject is a domain
//! noun validated on construction, so that a typo in a route or policy
//! table is caught when the table is built rather than silently never
//! matching at check time.

use serde::{Deserialize, Serialize};

/// Grants the holder every permission.
pub const WILDCARD: &str = "*";
/// Legacy spelling of [`WILDCARD`] still present in persisted policies.
pub const MANAGE_ALL: &str = "manage.all";

/// Whether the persisted permission name grants everything.
pub fn is_wildcard(name: &str) -> bool {
    name == WILDCARD || name == MANAGE_ALL
}

#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Manage,
    Approve,
    Reject,
    Export,
    Import,
    Sync,
    Reset,
}

/// The domain noun an action targets, e.g. `Employee`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subject(String);

/// A fully formed `<action>.<subject>` token.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PermissionName(String);

mod impls;
