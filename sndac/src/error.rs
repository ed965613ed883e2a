use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Backend(#[from] sndcore::error::BackendError),
    #[error("Missing required access control platform")]
    MissingPlatform,
    #[error(transparent)]
    Rbac(#[from] sndrbac::error::Error),
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error(transparent)]
    Value(#[from] sndcore::error::ValueError),
}
