#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing required policy backend")]
    BackendRequired,
    #[error(transparent)]
    Value(#[from] sndcore::error::ValueError),
}
