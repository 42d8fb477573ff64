//! Authentication routes
//!
//! Registration, login, the current user and profile images.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use crate::uploads::{public_origin, MultipartForm};
use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        Path, State,
    },
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use content_hub_shared::{
    LoginRequest, ProfileImageResponse, RegisterRequest, TokenResponse, UserResponse,
};

use super::parse_id;

/// Multipart field carrying the profile image
const PROFILE_IMAGE_FIELD: &str = "profileImage";

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_profile))
        .route("/uploadProfileImage", post(upload_profile_image))
        .route("/profile/:user_id", get(profile_image))
}

/// Register a new user
///
/// POST /api/auth/register
async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = body?;
    let token = UserService::register(state.users.as_ref(), state.jwt(), req).await?;
    Ok(Json(token))
}

/// Login with email and password
///
/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = body?;
    let token = UserService::login(state.users.as_ref(), state.jwt(), req).await?;
    Ok(Json(token))
}

/// Get the current user (requires authentication)
///
/// GET /api/auth/me
async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let profile = UserService::get_profile(state.users.as_ref(), auth_user.user_id).await?;
    Ok(Json(profile))
}

/// Replace the current user's profile image
///
/// POST /api/auth/uploadProfileImage
async fn upload_profile_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ProfileImageResponse>> {
    let mut form = MultipartForm::read(multipart?).await?;
    let file = form.require_image(PROFILE_IMAGE_FIELD)?;
    let origin = public_origin(&headers, &state.config().server);

    let response = UserService::set_profile_image(
        state.users.as_ref(),
        state.uploads.as_ref(),
        auth_user.user_id,
        file,
        &origin,
    )
    .await?;
    Ok(Json(response))
}

/// Public profile image lookup
///
/// GET /api/auth/profile/:userId
async fn profile_image(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ProfileImageResponse>> {
    let user_id = parse_id(&user_id, "user not found")?;
    let response = UserService::profile_image(state.users.as_ref(), user_id).await?;
    Ok(Json(response))
}
