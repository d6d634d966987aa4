//! Persistence layer: durable storage for confirmed actions.
//!
//! [`ActionStore`] abstracts the relational store so the listener and the
//! HTTP handlers can be tested against in-memory mocks. The concrete
//! implementation uses `sqlx::PgPool` for async PostgreSQL access.

pub mod postgres;

use async_trait::async_trait;

use crate::domain::Action;
use crate::error::GatewayError;

pub use postgres::PostgresActionStore;

/// Relational persistence for confirmed actions.
#[async_trait]
pub trait ActionStore: Send + Sync + std::fmt::Debug {
    /// Inserts a confirmed action and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConstraintViolation`] when the schema
    /// rejects the row, [`GatewayError::Persistence`] when the store is
    /// unreachable or the query fails.
    async fn insert(
        &self,
        user_address: &str,
        description: &str,
        timestamp: i64,
    ) -> Result<Action, GatewayError>;

    /// Returns every stored action, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] on database failure.
    async fn list_all(&self) -> Result<Vec<Action>, GatewayError>;

    /// Returns the given user's actions, newest first. A user with no
    /// actions yields an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] on database failure.
    async fn list_by_user(&self, user_address: &str) -> Result<Vec<Action>, GatewayError>;
}
