//! Patrika HTTP API: invitation editing, public card pages and image export.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod jobs;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod views;
