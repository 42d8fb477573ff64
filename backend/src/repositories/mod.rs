//! Database repositories
//!
//! Each repository is a port (an async trait) with a PostgreSQL adapter
//! backed by `sqlx` and an in-memory adapter for development and tests.

pub mod hotel;
pub mod note;
pub mod user;

use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

pub use hotel::{HotelRecord, HotelRepository, InMemoryHotelRepository, PgHotelRepository};
pub use note::{InMemoryNoteRepository, NoteRecord, NoteRepository, PgNoteRepository};
pub use user::{
    InMemoryUserRepository, NewUser, PgUserRepository, UserRecord, UserRepository,
};

/// PostgreSQL error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Errors raised by repository adapters
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The email is already taken by another user
    #[error("email already registered")]
    DuplicateEmail,

    /// Query or connection failure in the backing store
    #[error("repository query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Query(err.to_string())
    }
}

/// True when `err` is a unique violation on the named constraint
fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// The full set of repositories handed to `AppState`
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub hotels: Arc<dyn HotelRepository>,
    pub notes: Arc<dyn NoteRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            hotels: Arc::new(PgHotelRepository::new(pool.clone())),
            notes: Arc::new(PgNoteRepository::new(pool)),
        }
    }

    /// Process-local repositories; contents are lost on restart
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::default()),
            hotels: Arc::new(InMemoryHotelRepository::default()),
            notes: Arc::new(InMemoryNoteRepository::default()),
        }
    }
}
