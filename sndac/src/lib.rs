pub mod api;
pub mod error;
pub mod platform;
pub mod session;

pub use platform::Platform;
