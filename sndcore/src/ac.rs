pub mod permission;
pub mod principal;
pub mod role;
pub mod route;
pub mod traits;

pub use self::role::RoleName;
