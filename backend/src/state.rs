//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Everything in here is built once at startup and is read-only while
//! requests are served. Cloning only bumps reference counts.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::repositories::{HotelRepository, NoteRepository, Repositories, UserRepository};
use crate::uploads::{DiskUploadStore, UploadStore};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    pub users: Arc<dyn UserRepository>,
    pub hotels: Arc<dyn HotelRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub uploads: Arc<dyn UploadStore>,
}

impl AppState {
    /// Create a new application state
    ///
    /// The JWT keys are derived from the config secret here, so this should
    /// only be called once at application startup.
    pub fn new(
        config: AppConfig,
        repositories: Repositories,
        uploads: Arc<dyn UploadStore>,
    ) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.token_expiry_secs);

        Self {
            config: Arc::new(config),
            jwt,
            users: repositories.users,
            hotels: repositories.hotels,
            notes: repositories.notes,
            uploads,
        }
    }

    /// State over in-memory repositories, storing uploads in `uploads.dir`
    pub fn in_memory(config: AppConfig) -> Self {
        let uploads = Arc::new(DiskUploadStore::new(&config.uploads.dir));
        Self::new(config, Repositories::in_memory(), uploads)
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
