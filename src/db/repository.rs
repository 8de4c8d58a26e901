use crate::config::DatabaseConfig;
use crate::db::query::{QueryDescriptor, SqlParam};
use crate::error::DatabaseError;
use sqlx::postgres::{PgPoolOptions, PgRow};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres};
use std::sync::Arc;
use tracing::{debug, error};

/// Executes [`QueryDescriptor`]s against a bounded Postgres pool.
///
/// Every call checks out exactly one connection and hands it back when the
/// call returns, whether the statement succeeded or not.
#[derive(Clone)]
pub struct Repository {
    pool: Arc<PgPool>,
}

impl Repository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = Self::pool_options(config)
            .connect(&config.url)
            .await
            .map_err(|e| {
                error!("Failed to establish database pool: {}", e);
                DatabaseError::ConnectionError(e.to_string())
            })?;

        Ok(Self::new(Arc::new(pool)))
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }

    pub async fn execute<T>(&self, query: QueryDescriptor) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            error!(statement = query.statement, "Connection acquisition failed: {}", e);
            DatabaseError::ConnectionError(e.to_string())
        })?;

        let mut statement = sqlx::query_as::<Postgres, T>(query.statement);
        for param in query.params {
            statement = match param {
                SqlParam::Int(v) => statement.bind(v),
                SqlParam::Text(v) => statement.bind(v),
                SqlParam::NullableText(v) => statement.bind(v),
                SqlParam::Date(v) => statement.bind(v),
            };
        }

        let rows = statement.fetch_all(&mut *conn).await.map_err(|e| {
            error!(statement = query.statement, "Statement execution failed: {}", e);
            classify_statement_error(e)
        })?;

        // `conn` drops on both paths and goes back to the pool.
        debug!(statement = query.statement, rows = rows.len(), "Statement executed");
        Ok(rows)
    }

    pub fn pool_status(&self) -> DbPoolStatus {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;

        DbPoolStatus {
            total_connections: size,
            active_connections: size.saturating_sub(idle),
            idle_connections: idle,
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn classify_statement_error(err: sqlx::Error) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => DatabaseError::Duplicate,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DatabaseError::ConnectionError(err.to_string())
        }
        _ => DatabaseError::QueryError(err.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbPoolStatus {
    pub total_connections: u32,
    pub active_connections: u32,
    pub idle_connections: u32,
}
