//! Hotel listing service
//!
//! Every mutation fetches the listing, checks ownership and only then
//! writes. A stored image whose database write fails is removed again,
//! as is an image that gets replaced or whose listing is deleted.

use crate::auth::{ensure_owner, AuthUser};
use crate::error::ApiError;
use crate::repositories::{HotelRecord, HotelRepository, UserRepository};
use crate::uploads::{
    discard, discard_on_err, public_url, stored_filename, UploadStore, UploadedFile,
};
use content_hub_shared::{HotelForm, HotelResponse, MessageResponse};
use tracing::info;
use uuid::Uuid;

/// Hotel service for listing CRUD
pub struct HotelService;

impl HotelService {
    /// Create a listing owned by `user`; the image is mandatory
    pub async fn create(
        hotels: &dyn HotelRepository,
        users: &dyn UserRepository,
        uploads: &dyn UploadStore,
        user: AuthUser,
        form: HotelForm,
        image: Option<UploadedFile>,
        origin: &str,
    ) -> Result<HotelResponse, ApiError> {
        let draft = form.validate().map_err(ApiError::Validation)?;

        if users.find_by_id(user.user_id).await?.is_none() {
            return Err(ApiError::NotFound("user not found".to_string()));
        }

        let image = image.ok_or_else(|| ApiError::BadRequest("no file uploaded".to_string()))?;
        let filename = uploads.store(&image).await?;

        let created = hotels
            .create(user.user_id, draft, public_url(origin, &filename))
            .await;
        let hotel = discard_on_err(uploads, Some(filename.as_str()), created).await?;

        info!(hotel_id = %hotel.id, owner_id = %hotel.owner_id, "Hotel created");
        Ok(hotel.into())
    }

    /// The caller's listings, newest first
    pub async fn list(
        hotels: &dyn HotelRepository,
        user: AuthUser,
    ) -> Result<Vec<HotelResponse>, ApiError> {
        let listed = hotels.list_by_owner(user.user_id).await?;
        Ok(listed.into_iter().map(HotelResponse::from).collect())
    }

    /// Any listing by id; listings are public
    pub async fn get(hotels: &dyn HotelRepository, id: Uuid) -> Result<HotelResponse, ApiError> {
        Ok(find_hotel(hotels, id).await?.into())
    }

    /// Replace a listing's fields, and its image when a new one is sent
    pub async fn update(
        hotels: &dyn HotelRepository,
        uploads: &dyn UploadStore,
        user: AuthUser,
        id: Uuid,
        form: HotelForm,
        image: Option<UploadedFile>,
        origin: &str,
    ) -> Result<HotelResponse, ApiError> {
        let draft = form.validate().map_err(ApiError::Validation)?;

        let existing = find_hotel(hotels, id).await?;
        ensure_owner(&existing, &user)?;

        let stored = match image {
            Some(file) => Some(uploads.store(&file).await?),
            None => None,
        };
        let image_url = stored.as_deref().map(|filename| public_url(origin, filename));

        let updated = hotels
            .update(id, draft, image_url)
            .await
            .map_err(ApiError::from)
            .and_then(|hotel| hotel.ok_or_else(hotel_not_found));
        let hotel = discard_on_err(uploads, stored.as_deref(), updated).await?;

        if stored.is_some() {
            if let Some(old) = existing.image_url.as_deref().and_then(stored_filename) {
                discard(uploads, old).await;
            }
        }

        info!(hotel_id = %hotel.id, "Hotel updated");
        Ok(hotel.into())
    }

    pub async fn delete(
        hotels: &dyn HotelRepository,
        uploads: &dyn UploadStore,
        user: AuthUser,
        id: Uuid,
    ) -> Result<MessageResponse, ApiError> {
        let existing = find_hotel(hotels, id).await?;
        ensure_owner(&existing, &user)?;

        if !hotels.delete(id).await? {
            return Err(hotel_not_found());
        }

        if let Some(image) = existing.image_url.as_deref().and_then(stored_filename) {
            discard(uploads, image).await;
        }

        info!(hotel_id = %id, "Hotel deleted");
        Ok(MessageResponse::new("hotel deleted"))
    }
}

async fn find_hotel(hotels: &dyn HotelRepository, id: Uuid) -> Result<HotelRecord, ApiError> {
    hotels.find_by_id(id).await?.ok_or_else(hotel_not_found)
}

fn hotel_not_found() -> ApiError {
    ApiError::NotFound("hotel not found".to_string())
}
