//! Repository implementations for database operations.

pub mod invitation;
pub mod user;

pub use invitation::InvitationRepository;
pub use user::UserRepository;
