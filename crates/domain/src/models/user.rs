//! Account models and auth request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::jwt::TokenPair;
use shared::validation::{validate_password, validate_person_name, validate_phone};
use uuid::Uuid;
use validator::Validate;

pub use shared::jwt::Role;

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub wallet_balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name and phone must both be filled in before the dashboard unlocks.
    pub fn is_profile_complete(&self) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .map(|n| validate_person_name(n).is_ok())
            .unwrap_or(false);
        let phone_ok = self
            .phone
            .as_deref()
            .map(|p| validate_phone(p).is_ok())
            .unwrap_or(false);
        name_ok && phone_ok
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            role: self.role,
            wallet_balance: self.wallet_balance,
            profile_complete: self.is_profile_complete(),
            created_at: self.created_at,
        }
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub wallet_balance: i64,
    pub profile_complete: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create an account row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[validate(custom(function = "validate_person_name"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Profile completion form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "validate_person_name"))]
    pub name: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthResponse {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

/// Normalizes an email for lookups and uniqueness.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
