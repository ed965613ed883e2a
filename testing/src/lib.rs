#[cfg(feature = "ac")]
pub mod ac;
#[cfg(feature = "core")]
pub mod core;
