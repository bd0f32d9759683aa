//! Startup administrator account.
//!
//! Creates the administrator named in `admin.bootstrap_email` /
//! `admin.bootstrap_password` when both are configured and the account does
//! not exist yet. Idempotent: an existing account is never modified.

use domain::models::user::normalize_email;
use domain::models::{NewUser, Role};
use persistence::{StoreError, UserStore};
use shared::password::{hash_password, PasswordError};
use tracing::{info, warn};

use crate::config::AdminConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    NotConfigured,
    AlreadyExists,
    Created,
}

pub async fn bootstrap_admin(
    users: &dyn UserStore,
    config: &AdminConfig,
) -> Result<BootstrapOutcome, BootstrapError> {
    if config.bootstrap_email.trim().is_empty() {
        return Ok(BootstrapOutcome::NotConfigured);
    }
    if config.bootstrap_password.is_empty() {
        warn!("PATRIKA__ADMIN__BOOTSTRAP_EMAIL is set but the password is empty, skipping bootstrap");
        return Ok(BootstrapOutcome::NotConfigured);
    }

    let email = normalize_email(&config.bootstrap_email);
    if let Some(existing) = users.find_by_email(&email).await? {
        if existing.role != Role::Admin {
            warn!(
                user_id = %existing.id,
                "Bootstrap email belongs to a non-admin account, leaving it unchanged"
            );
        } else {
            info!("Administrator already exists, skipping bootstrap");
        }
        return Ok(BootstrapOutcome::AlreadyExists);
    }

    let user = users
        .create(NewUser {
            email,
            password_hash: hash_password(&config.bootstrap_password)?,
            name: Some("Administrator".to_string()),
            phone: None,
            role: Role::Admin,
        })
        .await?;

    info!(user_id = %user.id, "Bootstrap administrator created");
    warn!(
        "SECURITY: remove PATRIKA__ADMIN__BOOTSTRAP_PASSWORD from configuration after initial setup"
    );
    Ok(BootstrapOutcome::Created)
}
