//! Application services and clients for external collaborators.

pub mod admin_bootstrap;
pub mod auth;
pub mod rasterizer;
pub mod save_gate;
pub mod suggestion_client;

pub use admin_bootstrap::{bootstrap_admin, BootstrapOutcome};
pub use auth::{AuthService, LoginPortal};
pub use rasterizer::{DisabledCapturer, HttpCapturer};
pub use save_gate::{SaveGate, SaveGuard};
pub use suggestion_client::{DisabledSuggestionService, HttpSuggestionService};
