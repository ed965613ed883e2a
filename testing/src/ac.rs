use sndac::platform::{
    Builder,
    Platform,
};
use sndcore::platform::ConnectorOption;
use snddb_sqlite::SqliteBackend;
use std::{
    sync::Arc,
    time::Duration,
};

pub async fn create_sqlite_backend() -> anyhow::Result<SqliteBackend> {
    Ok(SqliteBackend::ac(
        ConnectorOption::from("sqlite::memory:")
            .acquire_timeout(Duration::from_secs(1))
    ).await?)
}

pub async fn create_sqlite_platform() -> anyhow::Result<Arc<Platform>> {
    let platform = Builder::new()
        .ac_platform(create_sqlite_backend().await?)
        .build()?;
    Ok(platform)
}
