use crate::{
    platform::PlatformUrl,
    ac::traits::{
        PolicyBackend,
        RoleBackend,
    },
};

/// ACPlatform - Access Control Platform
///
/// This platform is used to persist the role and permission assignments
/// that authorization decisions are resolved against.
///
/// This trait is applicable to everything that correctly implements the
/// relevant backends that compose this trait.
pub trait ACPlatform: PolicyBackend
    + RoleBackend
    + PlatformUrl
    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn ACPlatform;
}

pub trait DefaultACPlatform: ACPlatform {}

impl<P: PolicyBackend
    + RoleBackend
    + PlatformUrl
    + DefaultACPlatform
    + Send
    + Sync
> ACPlatform for P {
    fn as_dyn(&self) -> &dyn ACPlatform {
        self
    }
}
