//! Hotel listing routes
//!
//! Create and update take multipart bodies with the listing fields and
//! an `image` file. Listings are readable by anyone; writes are owner-only.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::HotelService;
use crate::state::AppState;
use crate::uploads::{public_origin, MultipartForm};
use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        Path, State,
    },
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use content_hub_shared::{HotelForm, HotelResponse, MessageResponse};

use super::parse_id;

const IMAGE_FIELD: &str = "image";

/// Create hotel routes
pub fn hotel_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_hotels).post(create_hotel))
        .route(
            "/:id",
            get(get_hotel).put(update_hotel).delete(delete_hotel),
        )
}

fn hotel_form(form: &MultipartForm) -> HotelForm {
    HotelForm {
        name: form.text("name"),
        email: form.text("email"),
        address: form.text("address"),
        price: form.text("price"),
        phone_number: form.text("phoneNumber"),
        currency: form.text("currency"),
    }
}

/// POST /api/hotel
async fn create_hotel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<HotelResponse>> {
    let mut form = MultipartForm::read(multipart?).await?;
    let image = form.take_image(IMAGE_FIELD)?;
    let origin = public_origin(&headers, &state.config().server);

    let hotel = HotelService::create(
        state.hotels.as_ref(),
        state.users.as_ref(),
        state.uploads.as_ref(),
        auth_user,
        hotel_form(&form),
        image,
        &origin,
    )
    .await?;
    Ok(Json(hotel))
}

/// GET /api/hotel
async fn list_hotels(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<Vec<HotelResponse>>> {
    let hotels = HotelService::list(state.hotels.as_ref(), auth_user).await?;
    Ok(Json(hotels))
}

/// GET /api/hotel/:id (public)
async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HotelResponse>> {
    let id = parse_id(&id, "hotel not found")?;
    let hotel = HotelService::get(state.hotels.as_ref(), id).await?;
    Ok(Json(hotel))
}

/// PUT /api/hotel/:id
async fn update_hotel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<HotelResponse>> {
    let id = parse_id(&id, "hotel not found")?;
    let mut form = MultipartForm::read(multipart?).await?;
    let image = form.take_image(IMAGE_FIELD)?;
    let origin = public_origin(&headers, &state.config().server);

    let hotel = HotelService::update(
        state.hotels.as_ref(),
        state.uploads.as_ref(),
        auth_user,
        id,
        hotel_form(&form),
        image,
        &origin,
    )
    .await?;
    Ok(Json(hotel))
}

/// DELETE /api/hotel/:id
async fn delete_hotel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "hotel not found")?;
    let response = HotelService::delete(
        state.hotels.as_ref(),
        state.uploads.as_ref(),
        auth_user,
        id,
    )
    .await?;
    Ok(Json(response))
}
