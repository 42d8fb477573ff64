//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the upload store and the token service.

pub mod hotel;
pub mod note;
pub mod user;

pub use hotel::HotelService;
pub use note::NoteService;
pub use user::UserService;
