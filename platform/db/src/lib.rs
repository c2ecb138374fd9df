//! Database primitives shared by the payroll crates.

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbErr,
    Statement, TransactionTrait,
};
use thiserror::Error;
use tracing::debug;

/// Shared connection pool alias.
pub type DbPool = DatabaseConnection;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://payroll.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
    #[error("failed to connect to database: {0}")]
    Connect(#[source] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Connection settings, usually read from the environment.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub sql_logging: bool,
}

fn default_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            sql_logging: false,
        }
    }
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Reads `DATABASE_URL`, `DB_MAX_CONNECTIONS` and `DB_SQL_LOGGING`.
    pub fn from_env() -> DbResult<Self> {
        let mut settings = Self::default();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                settings.url = url.trim().to_string();
            }
        }
        if let Ok(raw) = std::env::var("DB_MAX_CONNECTIONS") {
            settings.max_connections = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(DbError::InvalidSetting {
                    key: "DB_MAX_CONNECTIONS",
                    value: raw,
                })?;
        }
        settings.sql_logging = std::env::var("DB_SQL_LOGGING")
            .ok()
            .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(settings)
    }

    fn is_sqlite_memory(&self) -> bool {
        self.url.starts_with("sqlite") && self.url.contains(":memory:")
    }
}

/// Open a pool for the configured database.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let mut options = ConnectOptions::new(settings.url.clone());
    // An in-memory SQLite database lives and dies with a single connection.
    let max_connections = if settings.is_sqlite_memory() {
        1
    } else {
        settings.max_connections
    };
    options
        .max_connections(max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(settings.sql_logging);
    debug!(max_connections, "connecting database pool");
    Database::connect(options).await.map_err(DbError::Connect)
}

/// Open the per-call unit of work.
///
/// The returned transaction must be committed explicitly; dropping it on any
/// other path rolls the work back and returns the connection to the pool.
pub async fn begin_session(pool: &DbPool) -> Result<DatabaseTransaction, DbErr> {
    pool.begin().await
}

/// Cheap liveness probe used by health checks.
pub async fn ping(pool: &DbPool) -> bool {
    let backend = pool.get_database_backend();
    pool.execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok()
}
