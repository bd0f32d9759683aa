//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod editor;
pub mod health;
pub mod invitations;
pub mod profile;
pub mod public;
