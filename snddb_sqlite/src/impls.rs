use sndcore::platform::{ConnectorOption, PlatformUrl};
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::SqlitePoolOptions,
    Sqlite,
};
use std::sync::Arc;

use crate::SqliteBackend;

impl PlatformUrl for SqliteBackend {
    fn url(&self) -> &str {
        self.url.as_ref()
    }
}

impl SqliteBackend {
    pub async fn connect(opts: ConnectorOption) -> Result<SqliteBackend, sqlx::Error> {
        if opts.auto_create_db && !Sqlite::database_exists(&opts.url).await.unwrap_or(false) {
            log::warn!("sqlite database {} does not exist; creating...", &opts.url);
            Sqlite::create_database(&opts.url).await?
        }

        let pool_options = match opts.acquire_timeout {
            Some(timeout) => SqlitePoolOptions::new().acquire_timeout(timeout),
            None => SqlitePoolOptions::new(),
        };
        let pool = pool_options.connect(&opts.url).await?;
        Ok(SqliteBackend {
            pool: Arc::new(pool),
            url: opts.url,
        })
    }

    pub async fn migrate_ac(self) -> Result<Self, sqlx::Error> {
        sqlx::migrate!("migrations/sndac").run(&*self.pool).await?;
        Ok(self)
    }

    /// Connects and brings the schema up to date.
    pub async fn ac(opts: ConnectorOption) -> Result<Self, sqlx::Error> {
        Self::connect(opts).await?
            .migrate_ac()
            .await
    }

    /// Closes the underlying pool; every subsequent query fails.
    pub async fn close(&self) {
        self.pool.close().await
    }
}

mod ac;

mod default_impl {
    use sndcore::platform::DefaultACPlatform;
    use crate::SqliteBackend;

    impl DefaultACPlatform for SqliteBackend {}
}
