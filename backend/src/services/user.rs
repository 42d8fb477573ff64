//! User service for registration, login and profile images
//!
//! Password hashing and verification run on the blocking thread pool.
//! Token signing uses the pre-computed keys held by [`JwtService`].

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{NewUser, UserRecord, UserRepository};
use crate::uploads::{
    discard, discard_on_err, public_url, stored_filename, UploadStore, UploadedFile,
};
use content_hub_shared::validation::normalize_email;
use content_hub_shared::{
    AuthError, LoginRequest, ProfileImageResponse, RegisterRequest, TokenResponse, UserResponse,
};
use tracing::info;
use uuid::Uuid;

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user and issue a token for it
    pub async fn register(
        users: &dyn UserRepository,
        jwt: &JwtService,
        req: RegisterRequest,
    ) -> Result<TokenResponse, ApiError> {
        req.validate().map_err(ApiError::Validation)?;

        let email = normalize_email(&req.email);
        if users.email_exists(&email).await? {
            return Err(ApiError::Conflict("user exists".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password).await?;

        // A concurrent registration can still win the race; the store's
        // uniqueness violation surfaces as the same conflict.
        let user = users
            .create(NewUser {
                name: req.name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User registered");

        let token = jwt.issue(user.id)?;
        Ok(TokenResponse { token })
    }

    /// Exchange credentials for a token
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(
        users: &dyn UserRepository,
        jwt: &JwtService,
        req: LoginRequest,
    ) -> Result<TokenResponse, ApiError> {
        let email = normalize_email(&req.email);

        let verified = match users.find_by_email(&email).await? {
            Some(user) => {
                let valid = PasswordService::verify_async(req.password, user.password_hash).await?;
                valid.then_some(user.id)
            }
            None => {
                PasswordService::verify_unknown_user(req.password).await?;
                None
            }
        };

        let user_id = verified.ok_or(AuthError::InvalidCredentials)?;
        let token = jwt.issue(user_id)?;
        Ok(TokenResponse { token })
    }

    /// The authenticated user, without the password hash
    pub async fn get_profile(
        users: &dyn UserRepository,
        user_id: Uuid,
    ) -> Result<UserResponse, ApiError> {
        let user = find_user(users, user_id).await?;
        Ok(user.into())
    }

    /// Store a new profile image and record its public URL
    pub async fn set_profile_image(
        users: &dyn UserRepository,
        uploads: &dyn UploadStore,
        user_id: Uuid,
        file: UploadedFile,
        origin: &str,
    ) -> Result<ProfileImageResponse, ApiError> {
        let previous = find_user(users, user_id).await?.profile_image_url;

        let filename = uploads.store(&file).await?;
        let url = public_url(origin, &filename);

        let updated = users
            .set_profile_image(user_id, &url)
            .await
            .map_err(ApiError::from)
            .and_then(|user| user.ok_or_else(user_not_found));
        let user = discard_on_err(uploads, Some(filename.as_str()), updated).await?;

        if let Some(old) = previous.as_deref().and_then(stored_filename) {
            discard(uploads, old).await;
        }

        info!(user_id = %user.id, filename = %filename, "Profile image updated");

        Ok(ProfileImageResponse {
            profile_image_url: user.profile_image_url,
        })
    }

    /// Public lookup of a user's profile image
    pub async fn profile_image(
        users: &dyn UserRepository,
        user_id: Uuid,
    ) -> Result<ProfileImageResponse, ApiError> {
        let user = find_user(users, user_id).await?;
        Ok(ProfileImageResponse {
            profile_image_url: user.profile_image_url,
        })
    }
}

async fn find_user(users: &dyn UserRepository, user_id: Uuid) -> Result<UserRecord, ApiError> {
    users.find_by_id(user_id).await?.ok_or_else(user_not_found)
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("user not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryUserRepository;
    use crate::uploads::DiskUploadStore;
    use axum::body::Bytes;

    fn jwt() -> JwtService {
        JwtService::new("user-service-secret", 3600)
    }

    fn alice() -> RegisterRequest {
        RegisterRequest {
            name: "Alice".to_string(),
            email: "Alice@Example.com".to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_issues_token_for_new_user() {
        let users = InMemoryUserRepository::default();
        let jwt = jwt();

        let response = UserService::register(&users, &jwt, alice()).await.unwrap();
        let user_id = jwt.verify_user(&response.token).unwrap();

        let stored = users.find_by_id(user_id).await.unwrap().unwrap();
        assert_eq!(stored.email, "alice@example.com");
        assert_ne!(stored.password_hash, "correct horse");
    }

    #[tokio::test]
    async fn test_register_twice_is_conflict() {
        let users = InMemoryUserRepository::default();
        let jwt = jwt();
        UserService::register(&users, &jwt, alice()).await.unwrap();

        let mut again = alice();
        again.email = "alice@example.com".to_string();
        let err = UserService::register(&users, &jwt, again).await.unwrap_err();

        assert!(matches!(err, ApiError::Conflict(ref msg) if msg == "user exists"));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_fields() {
        let users = InMemoryUserRepository::default();
        let req = RegisterRequest {
            name: String::new(),
            email: "nope".to_string(),
            password: "short".to_string(),
        };

        let err = UserService::register(&users, &jwt(), req).await.unwrap_err();
        match err {
            ApiError::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let users = InMemoryUserRepository::default();
        let jwt = jwt();
        UserService::register(&users, &jwt, alice()).await.unwrap();

        let wrong_password = UserService::login(
            &users,
            &jwt,
            LoginRequest {
                email: "alice@example.com".to_string(),
                password: "wrong password".to_string(),
            },
        )
        .await
        .unwrap_err();
        let unknown_email = UserService::login(
            &users,
            &jwt,
            LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "wrong password".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(wrong_password, ApiError::Auth(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, ApiError::Auth(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_matches_email_case_insensitively() {
        let users = InMemoryUserRepository::default();
        let jwt = jwt();
        let registered = UserService::register(&users, &jwt, alice()).await.unwrap();

        let login = UserService::login(
            &users,
            &jwt,
            LoginRequest {
                email: " ALICE@example.com".to_string(),
                password: "correct horse".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(
            jwt.verify_user(&login.token).unwrap(),
            jwt.verify_user(&registered.token).unwrap()
        );
    }

    fn avatar(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(b"\x89PNG"),
        }
    }

    #[tokio::test]
    async fn test_new_profile_image_replaces_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = DiskUploadStore::new(dir.path());
        let users = InMemoryUserRepository::default();
        let jwt = jwt();
        let token = UserService::register(&users, &jwt, alice()).await.unwrap().token;
        let user_id = jwt.verify_user(&token).unwrap();

        let first = UserService::set_profile_image(
            &users,
            &uploads,
            user_id,
            avatar("first.png"),
            "http://hub.test",
        )
        .await
        .unwrap();
        let second = UserService::set_profile_image(
            &users,
            &uploads,
            user_id,
            avatar("second.png"),
            "http://hub.test",
        )
        .await
        .unwrap();

        let first = stored_filename(first.profile_image_url.as_deref().unwrap()).unwrap();
        let second = stored_filename(second.profile_image_url.as_deref().unwrap()).unwrap();
        assert!(!dir.path().join(first).exists());
        assert!(dir.path().join(second).exists());
    }

    #[tokio::test]
    async fn test_profile_of_missing_user_is_not_found() {
        let users = InMemoryUserRepository::default();
        let err = UserService::get_profile(&users, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
