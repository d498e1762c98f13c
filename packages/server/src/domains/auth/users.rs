//! User accounts and their storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use intake::UserId;
use sqlx::postgres::PgPool;
use sqlx::Row;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// A registered user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

/// Storage for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`UserStoreError::DuplicateEmail`] if
    /// the email is taken.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, UserStoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;
}

// ============================================================================
// PostgreSQL implementation
// ============================================================================

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Reuse an existing pool and run migrations.
    pub async fn from_pool(pool: PgPool) -> Result<Self, UserStoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), UserStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }
}

fn storage_err(e: sqlx::Error) -> UserStoreError {
    UserStoreError::Storage(e.into())
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> Result<User, UserStoreError> {
    Ok(User {
        id: row.try_get("id").map_err(storage_err)?,
        email: row.try_get("email").map_err(storage_err)?,
        password_hash: row.try_get("password_hash").map_err(storage_err)?,
        created_at: row.try_get("created_at").map_err(storage_err)?,
    })
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, UserStoreError> {
        let id = UserId::new();
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => user_from_row(&row),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(UserStoreError::DuplicateEmail)
            }
            Err(e) => Err(storage_err(e)),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.as_ref().map(user_from_row).transpose()
    }
}

// ============================================================================
// In-memory implementation (tests and local development)
// ============================================================================

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, UserStoreError> {
        let mut users = self.users.write().unwrap();
        if users.contains_key(email) {
            return Err(UserStoreError::DuplicateEmail);
        }
        let user = User {
            id: UserId::new(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(email.to_string(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        Ok(self.users.read().unwrap().get(email).cloned())
    }
}
