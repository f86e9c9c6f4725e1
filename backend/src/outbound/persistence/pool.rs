//! Pooled async PostgreSQL connections for the roster repositories.
//!
//! Queue workers each hold at most one connection per job, so the pool is
//! sized from the worker count plus headroom for the orchestrator's own
//! orphan and tree-sort queries.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Connections reserved for the orchestrator beside the worker pool.
const ORCHESTRATOR_HEADROOM: u32 = 2;

/// Errors raised while building or using the pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available in time.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool could not be created.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    /// Checkout failure.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Build failure.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Pool for `workers` concurrent reconcilers against `database_url`.
    pub fn for_workers(database_url: impl Into<String>, workers: usize) -> Self {
        let workers = u32::try_from(workers).unwrap_or(u32::MAX);
        Self {
            database_url: database_url.into(),
            max_size: workers.saturating_add(ORCHESTRATOR_HEADROOM),
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Override the checkout timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Maximum pooled connections.
    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Shared bb8 pool of `diesel-async` connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the URL is invalid or the server
    /// cannot be reached.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner: pool })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when the timeout elapses.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(4, 6)]
    #[case(0, 2)]
    #[case(usize::MAX, u32::MAX)]
    fn pool_is_sized_from_workers(#[case] workers: usize, #[case] expected: u32) {
        let config = PoolConfig::for_workers("postgres://localhost/roster", workers);
        assert_eq!(config.max_size(), expected);
        assert_eq!(config.database_url(), "postgres://localhost/roster");
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
    }

    #[rstest]
    fn timeout_can_be_overridden() {
        let config = PoolConfig::for_workers("postgres://localhost/roster", 1)
            .with_connection_timeout(Duration::from_secs(5));
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }

    #[rstest]
    fn errors_carry_their_message() {
        assert!(PoolError::checkout("refused").to_string().contains("refused"));
        assert!(PoolError::build("bad url").to_string().contains("bad url"));
    }
}
