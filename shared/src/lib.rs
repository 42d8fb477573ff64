//! Content Hub Shared Library
//!
//! Wire types, field validation and the authentication error taxonomy
//! shared between the backend and its clients.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
pub use validation::FieldError;
