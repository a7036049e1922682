//! Database primitives and the employee record stores.

mod database;
mod fixture;
mod seed;
mod store;

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

pub use database::DbEmployeeStore;
pub use fixture::StaticEmployeeStore;
pub use seed::{default_employees, ensure_seeded};
pub use store::{
    Employee, EmployeeChanges, EmployeeStore, NewEmployee, StoreError, StoreResult,
};

/// Shared connection pool alias.
pub type DbPool = DatabaseConnection;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    url: String,
    max_connections: u32,
    connect_timeout: Duration,
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }
}

pub async fn connect(settings: &DatabaseSettings) -> StoreResult<DbPool> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .connect_timeout(settings.connect_timeout)
        .sqlx_logging(false);
    // SQLite pools are sized by the driver; an in-memory database is private
    // to a single connection.
    if !settings.is_sqlite() {
        options.max_connections(settings.max_connections);
    }
    let pool = Database::connect(options).await?;
    info!(backend = ?pool.get_database_backend(), "database connected");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_sqlite_urls() {
        assert!(DatabaseSettings::new("sqlite::memory:").is_sqlite());
        assert!(DatabaseSettings::new("sqlite://lumon.db?mode=rwc").is_sqlite());
        assert!(!DatabaseSettings::new("postgres://lumon@localhost/lumon").is_sqlite());
    }

    #[test]
    fn max_connections_never_drops_to_zero() {
        let settings = DatabaseSettings::new("postgres://x").with_max_connections(0);
        assert_eq!(settings.max_connections, 1);
    }
}
