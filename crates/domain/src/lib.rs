//! Domain layer for Patrika.
//!
//! This crate contains:
//! - The invitation document model and its style overlay
//! - Editor commands, card renderer and export pipeline
//! - Share text, social metadata and the public lookup resolver
//! - Account models and auth DTOs

pub mod models;
pub mod services;
