//! Shared utilities and common types for the Patrika backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Public identifier generation and content digests
//! - JWT access/refresh tokens (RS256)
//! - Password hashing with Argon2id
//! - Cursor pagination
//! - Field validators used by request DTOs

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
