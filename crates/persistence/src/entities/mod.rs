//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod invitation;
pub mod user;

pub use invitation::{InvitationEntity, PublicInvitationEntity};
pub use user::UserEntity;
