//! User repository for credential storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use content_hub_shared::UserResponse;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{is_unique_violation, RepositoryError};
use crate::db;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Drops the password hash
impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            profile_image_url: user.profile_image_url,
            created_at: user.created_at,
        }
    }
}

/// Input for creating a user; the email is already normalized
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Port for user persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user, failing with `DuplicateEmail` if the email is taken
    async fn create(&self, user: NewUser) -> Result<UserRecord, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError>;

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError>;

    /// Store the profile image URL; `None` if the user does not exist
    async fn set_profile_image(
        &self,
        id: Uuid,
        url: &str,
    ) -> Result<Option<UserRecord>, RepositoryError>;

    /// Check the backing store is reachable
    async fn ping(&self) -> Result<(), RepositoryError>;
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, profile_image_url, created_at, updated_at";

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<UserRecord, RepositoryError> {
        let query = format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, UserRecord>(&query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "users_email_key") {
                    RepositoryError::DuplicateEmail
                } else {
                    e.into()
                }
            })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let user = sqlx::query_as::<_, UserRecord>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, UserRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn set_profile_image(
        &self,
        id: Uuid,
        url: &str,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        let query = format!(
            r#"
            UPDATE users SET profile_image_url = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, UserRecord>(&query)
            .bind(id)
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        db::health_check(&self.pool)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }
}

/// In-memory user repository
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<UserRecord, RepositoryError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::DuplicateEmail);
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            profile_image_url: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().any(|user| user.email == email))
    }

    async fn set_profile_image(
        &self,
        id: Uuid,
        url: &str,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.profile_image_url = Some(url.to_string());
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
