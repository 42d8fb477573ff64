//! Hotel listing repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use content_hub_shared::{HotelDraft, HotelResponse};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::RepositoryError;
use crate::auth::Owned;

/// Hotel record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HotelRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub price: Decimal,
    pub phone_number: String,
    pub currency: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for HotelRecord {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl From<HotelRecord> for HotelResponse {
    fn from(record: HotelRecord) -> Self {
        Self {
            id: record.id.to_string(),
            owner_id: record.owner_id.to_string(),
            name: record.name,
            email: record.email,
            address: record.address,
            price: record.price,
            phone_number: record.phone_number,
            currency: record.currency,
            image_url: record.image_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Port for hotel persistence
#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn create(
        &self,
        owner_id: Uuid,
        draft: HotelDraft,
        image_url: String,
    ) -> Result<HotelRecord, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<HotelRecord>, RepositoryError>;

    /// All hotels of one owner, newest first
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<HotelRecord>, RepositoryError>;

    /// Replace the content fields; the image only changes when one is given
    async fn update(
        &self,
        id: Uuid,
        draft: HotelDraft,
        image_url: Option<String>,
    ) -> Result<Option<HotelRecord>, RepositoryError>;

    /// Returns whether a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}

const HOTEL_COLUMNS: &str = "id, owner_id, name, email, address, price, phone_number, \
     currency, image_url, created_at, updated_at";

/// PostgreSQL hotel repository
#[derive(Clone)]
pub struct PgHotelRepository {
    pool: PgPool,
}

impl PgHotelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HotelRepository for PgHotelRepository {
    async fn create(
        &self,
        owner_id: Uuid,
        draft: HotelDraft,
        image_url: String,
    ) -> Result<HotelRecord, RepositoryError> {
        let query = format!(
            r#"
            INSERT INTO hotels (owner_id, name, email, address, price, phone_number, currency, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {HOTEL_COLUMNS}
            "#
        );

        let hotel = sqlx::query_as::<_, HotelRecord>(&query)
            .bind(owner_id)
            .bind(draft.name)
            .bind(draft.email)
            .bind(draft.address)
            .bind(draft.price)
            .bind(draft.phone_number)
            .bind(draft.currency)
            .bind(image_url)
            .fetch_one(&self.pool)
            .await?;

        Ok(hotel)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<HotelRecord>, RepositoryError> {
        let query = format!("SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1");

        let hotel = sqlx::query_as::<_, HotelRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hotel)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<HotelRecord>, RepositoryError> {
        let query = format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels WHERE owner_id = $1 ORDER BY created_at DESC"
        );

        let hotels = sqlx::query_as::<_, HotelRecord>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(hotels)
    }

    async fn update(
        &self,
        id: Uuid,
        draft: HotelDraft,
        image_url: Option<String>,
    ) -> Result<Option<HotelRecord>, RepositoryError> {
        let query = format!(
            r#"
            UPDATE hotels SET
                name = $2,
                email = $3,
                address = $4,
                price = $5,
                phone_number = $6,
                currency = $7,
                image_url = COALESCE($8, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {HOTEL_COLUMNS}
            "#
        );

        let hotel = sqlx::query_as::<_, HotelRecord>(&query)
            .bind(id)
            .bind(draft.name)
            .bind(draft.email)
            .bind(draft.address)
            .bind(draft.price)
            .bind(draft.phone_number)
            .bind(draft.currency)
            .bind(image_url)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hotel)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// In-memory hotel repository
#[derive(Default)]
pub struct InMemoryHotelRepository {
    hotels: RwLock<HashMap<Uuid, HotelRecord>>,
}

#[async_trait]
impl HotelRepository for InMemoryHotelRepository {
    async fn create(
        &self,
        owner_id: Uuid,
        draft: HotelDraft,
        image_url: String,
    ) -> Result<HotelRecord, RepositoryError> {
        let now = Utc::now();
        let record = HotelRecord {
            id: Uuid::new_v4(),
            owner_id,
            name: draft.name,
            email: draft.email,
            address: draft.address,
            price: draft.price,
            phone_number: draft.phone_number,
            currency: draft.currency,
            image_url: Some(image_url),
            created_at: now,
            updated_at: now,
        };
        self.hotels.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<HotelRecord>, RepositoryError> {
        Ok(self.hotels.read().await.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<HotelRecord>, RepositoryError> {
        let hotels = self.hotels.read().await;
        let mut owned: Vec<HotelRecord> = hotels
            .values()
            .filter(|hotel| hotel.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update(
        &self,
        id: Uuid,
        draft: HotelDraft,
        image_url: Option<String>,
    ) -> Result<Option<HotelRecord>, RepositoryError> {
        let mut hotels = self.hotels.write().await;
        Ok(hotels.get_mut(&id).map(|hotel| {
            hotel.name = draft.name;
            hotel.email = draft.email;
            hotel.address = draft.address;
            hotel.price = draft.price;
            hotel.phone_number = draft.phone_number;
            hotel.currency = draft.currency;
            if image_url.is_some() {
                hotel.image_url = image_url;
            }
            hotel.updated_at = Utc::now();
            hotel.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.hotels.write().await.remove(&id).is_some())
    }
}
