//! Persistence layer for Patrika.
//!
//! This crate contains:
//! - Storage traits for invitations, the public alias index and accounts
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - PostgreSQL repository implementations
//! - In-memory stores for development and tests

pub mod db;
pub mod entities;
pub mod memory;
pub mod metrics;
pub mod repositories;
pub mod store;

pub use memory::{MemoryInvitationStore, MemoryUserStore};
pub use repositories::{InvitationRepository, UserRepository};
pub use store::{InvitationStore, PageCursor, StoreError, UserStore};
