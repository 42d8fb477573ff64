//! Text note repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use content_hub_shared::NoteResponse;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::RepositoryError;
use crate::auth::Owned;

/// Note record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NoteRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for NoteRecord {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl From<NoteRecord> for NoteResponse {
    fn from(record: NoteRecord) -> Self {
        Self {
            id: record.id.to_string(),
            owner_id: record.owner_id.to_string(),
            content: record.content,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Port for note persistence
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn create(&self, owner_id: Uuid, content: &str) -> Result<NoteRecord, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NoteRecord>, RepositoryError>;

    /// All notes of one owner, newest first
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<NoteRecord>, RepositoryError>;

    async fn update(&self, id: Uuid, content: &str)
        -> Result<Option<NoteRecord>, RepositoryError>;

    /// Returns whether a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}

/// PostgreSQL note repository
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn create(&self, owner_id: Uuid, content: &str) -> Result<NoteRecord, RepositoryError> {
        let note = sqlx::query_as::<_, NoteRecord>(
            r#"
            INSERT INTO notes (owner_id, content)
            VALUES ($1, $2)
            RETURNING id, owner_id, content, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NoteRecord>, RepositoryError> {
        let note = sqlx::query_as::<_, NoteRecord>(
            r#"
            SELECT id, owner_id, content, created_at, updated_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<NoteRecord>, RepositoryError> {
        let notes = sqlx::query_as::<_, NoteRecord>(
            r#"
            SELECT id, owner_id, content, created_at, updated_at
            FROM notes
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    async fn update(
        &self,
        id: Uuid,
        content: &str,
    ) -> Result<Option<NoteRecord>, RepositoryError> {
        let note = sqlx::query_as::<_, NoteRecord>(
            r#"
            UPDATE notes SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// In-memory note repository
#[derive(Default)]
pub struct InMemoryNoteRepository {
    notes: RwLock<HashMap<Uuid, NoteRecord>>,
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn create(&self, owner_id: Uuid, content: &str) -> Result<NoteRecord, RepositoryError> {
        let now = Utc::now();
        let record = NoteRecord {
            id: Uuid::new_v4(),
            owner_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.notes.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NoteRecord>, RepositoryError> {
        Ok(self.notes.read().await.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<NoteRecord>, RepositoryError> {
        let notes = self.notes.read().await;
        let mut owned: Vec<NoteRecord> = notes
            .values()
            .filter(|note| note.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update(
        &self,
        id: Uuid,
        content: &str,
    ) -> Result<Option<NoteRecord>, RepositoryError> {
        let mut notes = self.notes.write().await;
        Ok(notes.get_mut(&id).map(|note| {
            note.content = content.to_string();
            note.updated_at = Utc::now();
            note.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.notes.write().await.remove(&id).is_some())
    }
}
