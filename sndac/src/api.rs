//! Guarding API handlers.
//!
//! Handlers declare the permission they require as an [`ApiPermission`],
//! optionally with an alternative permission that is also acceptable,
//! and ask the platform for an [`Authorization`] before doing any work.

use serde::Serialize;
use sndcore::ac::permission::{Action, Subject};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct ApiPermission {
    pub action: Action,
    pub subject: Subject,
    pub fallback: Option<(Action, Subject)>,
}

impl ApiPermission {
    pub fn new(action: Action, subject: Subject) -> Self {
        Self {
            action,
            subject,
            fallback: None,
        }
    }

    /// Also accept `action` on `subject` when the primary permission is
    /// not held.
    pub fn or(mut self, action: Action, subject: Subject) -> Self {
        self.fallback = Some((action, subject));
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    Inactive,
    InsufficientPermissions,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Authorization {
    Granted,
    Denied(Denial),
}

impl Authorization {
    pub fn is_granted(&self) -> bool {
        matches!(self, Authorization::Granted)
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Denial::Inactive => "Inactive account",
            Denial::InsufficientPermissions => "Insufficient permissions",
        })
    }
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authorization::Granted => f.write_str("Granted"),
            Authorization::Denied(denial) => write!(f, "Denied: {denial}"),
        }
    }
}
