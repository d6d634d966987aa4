//! PostgreSQL implementation of the persistence layer.

use async_trait::async_trait;
use sqlx::PgPool;

use super::ActionStore;
use crate::domain::Action;
use crate::error::GatewayError;

/// PostgreSQL-backed [`ActionStore`] using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresActionStore {
    pool: PgPool,
}

impl PostgresActionStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActionStore for PostgresActionStore {
    async fn insert(
        &self,
        user_address: &str,
        description: &str,
        timestamp: i64,
    ) -> Result<Action, GatewayError> {
        let row = sqlx::query_as::<_, (i64, String, String, i64)>(
            "INSERT INTO actions (user_address, description, timestamp) \
             VALUES ($1, $2, $3) \
             RETURNING id, user_address, description, timestamp",
        )
        .bind(user_address)
        .bind(description)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(map_store_error)?;

        Ok(row_to_action(row))
    }

    async fn list_all(&self) -> Result<Vec<Action>, GatewayError> {
        let rows = sqlx::query_as::<_, (i64, String, String, i64)>(
            "SELECT id, user_address, description, timestamp FROM actions \
             ORDER BY timestamp DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_store_error)?;

        Ok(rows.into_iter().map(row_to_action).collect())
    }

    async fn list_by_user(&self, user_address: &str) -> Result<Vec<Action>, GatewayError> {
        let rows = sqlx::query_as::<_, (i64, String, String, i64)>(
            "SELECT id, user_address, description, timestamp FROM actions \
             WHERE user_address = $1 ORDER BY timestamp DESC",
        )
        .bind(user_address)
        .fetch_all(&self.pool)
        .await
        .map_err(map_store_error)?;

        Ok(rows.into_iter().map(row_to_action).collect())
    }
}

fn row_to_action((id, user_address, description, timestamp): (i64, String, String, i64)) -> Action {
    Action {
        id,
        user_address,
        description,
        timestamp,
    }
}

/// Distinguishes schema rejections from everything else so the listener
/// can log them under the right taxonomy.
fn map_store_error(e: sqlx::Error) -> GatewayError {
    match &e {
        sqlx::Error::Database(db) if db.constraint().is_some() => {
            GatewayError::ConstraintViolation(db.message().to_string())
        }
        _ => GatewayError::Persistence(e.to_string()),
    }
}
