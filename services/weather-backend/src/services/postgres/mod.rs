/// Implementation of the subscription storage using postgres
mod subscription;

use common::err_context::ErrorContextExt;
use common::settings::DatabaseSettings;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::{Duration, Instant};

use crate::domain::ports::secondary::StorageError as Error;

/// Delay between two connection attempts while waiting for the database.
const WAIT_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pub pool: PgPool,
    pub config: DatabaseSettings,
}

impl PostgresStorage {
    /// Connects to the database, waiting for it to come online, and applies
    /// the embedded migrations if the settings ask for it.
    pub async fn new(config: DatabaseSettings) -> Result<PostgresStorage, Error> {
        let pool = wait_for_database(&config).await?;
        tracing::debug!(
            "Connected Postgres Pool to {}:{}/{}",
            config.host,
            config.port,
            config.database_name
        );
        let storage = PostgresStorage { pool, config };
        if storage.config.migrate {
            storage.migrate().await?;
        }
        Ok(storage)
    }

    pub async fn migrate(&self) -> Result<(), Error> {
        tracing::info!("Running database migrations");
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .context("Could not run migrations")?;
        Ok(())
    }
}

pub async fn connect_with_options(config: &DatabaseSettings) -> Result<PgPool, Error> {
    let options = config.connect_options();
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_millis(config.connection_timeout))
        .connect_with(options)
        .await
        .context(format!(
            "Could not establish connection to {}:{} with timeout {}ms",
            config.host, config.port, config.connection_timeout
        ))?;

    Ok(pool)
}

/// Retries the connection every couple of seconds, up to `wait_timeout` seconds.
pub async fn wait_for_database(config: &DatabaseSettings) -> Result<PgPool, Error> {
    if config.max_connections == 0 {
        return Err(Error::Configuration {
            context: "max_connections must be at least 1".to_string(),
        });
    }
    let deadline = Instant::now() + Duration::from_secs(config.wait_timeout);
    loop {
        match connect_with_options(config).await {
            Ok(pool) => return Ok(pool),
            Err(err @ Error::Connection { .. }) if Instant::now() < deadline => {
                tracing::warn!("Database not ready yet: {err}");
                tokio::time::sleep(WAIT_INTERVAL).await;
            }
            Err(err) => return Err(err),
        }
    }
}
