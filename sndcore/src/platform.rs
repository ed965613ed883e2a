mod access_control;
mod connector;
pub use access_control::{DefaultACPlatform, ACPlatform};
pub use connector::ConnectorOption;

pub trait PlatformUrl {
    fn url(&self) -> &str;
}
