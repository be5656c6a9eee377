use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod serializer;
pub mod service;
pub mod validation;

pub use config::Config;
pub use handlers::{router, AppState};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("Failed to build connection pool: {0}")]
    Pool(#[from] r2d2::PoolError),
    #[error("Failed to run migrations: {0}")]
    Migration(String),
}

/// Enables foreign keys on every pooled connection; SQLite keeps them off by default.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn establish_pool(config: &Config) -> Result<DbPool, DatabaseSetupError> {
    let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
    let pool = Pool::builder()
        .max_size(config.pool_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)?;
    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), DatabaseSetupError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseSetupError::Migration(e.to_string()))?;
    for migration in applied {
        info!("Applied migration {}", migration);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use tempfile::TempDir;

    use super::*;

    /// A migrated pool over a fresh database file. Keep the `TempDir` alive
    /// for as long as the pool is used.
    pub fn test_pool() -> (TempDir, DbPool) {
        test_pool_with_size(2)
    }

    pub fn test_pool_with_size(pool_size: u32) -> (TempDir, DbPool) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_url: dir.path().join("test.db").to_string_lossy().into_owned(),
            host: "127.0.0.1".to_string(),
            port: 0,
            pool_size,
        };
        let pool = establish_pool(&config).unwrap();
        run_migrations(&pool).unwrap();
        (dir, pool)
    }
}
