use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

/// Handle to the entity store. One per process, shared behind an `Arc`.
pub struct Database {
    pub conn: DatabaseConnection,
}

impl Database {
    /// Open or create a database at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening database at: {}", path.display());

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let url = format!("sqlite://{}?mode=rwc", path.display());

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(16)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let conn = SeaDatabase::connect(opt)
            .await
            .wrap_err_with(|| format!("Failed to open database: {}", path.display()))?;

        let database = Self::from_connection(conn).await?;
        tracing::info!("Database ready at: {}", path.display());
        Ok(database)
    }

    /// Wrap an existing connection, enabling foreign keys and running migrations.
    pub async fn from_connection(conn: DatabaseConnection) -> Result<Self> {
        tracing::debug!("Running database migrations");
        migration::Migrator::up(&conn, None)
            .await
            .wrap_err("Failed to run database migrations")?;

        // Cascading deletes of shows depend on this
        conn.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .wrap_err("Failed to enable foreign keys")?;

        Ok(Database { conn })
    }
}
