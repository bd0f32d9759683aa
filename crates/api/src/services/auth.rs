//! Account registration, login and token refresh.

use domain::models::user::{normalize_email, AuthResponse};
use domain::models::{NewUser, Role, User};
use persistence::{StoreError, UserStore};
use shared::jwt::{extract_user_id, JwtConfig, JwtError, TokenPair};
use shared::password::{hash_password, verify_against_dummy, verify_password, PasswordError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;

pub const ADMIN_PORTAL_MESSAGE: &str = "Admin users must log in via the Admin Portal";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{}", ADMIN_PORTAL_MESSAGE)]
    AdminMustUsePortal,

    #[error("Administrator access required")]
    NotAdmin,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidRefreshToken => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::AdminMustUsePortal | AuthError::NotAdmin => {
                ApiError::Forbidden(err.to_string())
            }
            AuthError::UserNotFound => ApiError::NotFound(err.to_string()),
            AuthError::Token(e) => ApiError::Internal(format!("Token error: {}", e)),
            AuthError::Password(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::Store(e) => e.into(),
        }
    }
}

/// Which login form the credentials came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPortal {
    Customer,
    Admin,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtConfig>,
    /// Normalized administrator email, if one is configured.
    admin_email: Option<String>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: Arc<JwtConfig>, admin_email: &str) -> Self {
        let admin_email = Some(normalize_email(admin_email)).filter(|e| !e.is_empty());
        Self {
            users,
            jwt,
            admin_email,
        }
    }

    fn respond(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let tokens = self.jwt.issue_pair(user.id, user.role)?;
        Ok(AuthResponse {
            user: user.profile(),
            tokens,
        })
    }

    fn is_admin_email(&self, email: &str) -> bool {
        self.admin_email.as_deref() == Some(email)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(email);
        if self.is_admin_email(&email) || self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let user = self
            .users
            .create(NewUser {
                email,
                password_hash: hash_password(password)?,
                name: name.map(|n| n.trim().to_string()),
                phone: phone.map(|p| p.trim().to_string()),
                role: Role::User,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailAlreadyExists,
                other => other.into(),
            })?;

        info!(user_id = %user.id, "User registered");
        self.respond(&user)
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        portal: LoginPortal,
    ) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(email);
        if portal == LoginPortal::Customer && self.is_admin_email(&email) {
            warn!("Administrator attempted customer login");
            return Err(AuthError::AdminMustUsePortal);
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            verify_against_dummy(password);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        match (portal, user.role) {
            (LoginPortal::Customer, Role::Admin) => return Err(AuthError::AdminMustUsePortal),
            (LoginPortal::Admin, Role::User) => {
                warn!(user_id = %user.id, "Non-admin attempted admin login");
                return Err(AuthError::NotAdmin);
            }
            _ => {}
        }

        info!(user_id = %user.id, role = user.role.as_str(), "User logged in");
        self.respond(&user)
    }

    /// Exchanges a refresh token for a new pair, re-reading the account so
    /// role changes take effect.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;
        let user_id = extract_user_id(&claims).map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        Ok(self.jwt.issue_pair(user.id, user.role)?)
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: &str,
        phone: &str,
    ) -> Result<User, AuthError> {
        let user = self
            .users
            .update_profile(user_id, name.trim(), phone.trim())
            .await?
            .ok_or(AuthError::UserNotFound)?;
        info!(
            user_id = %user.id,
            profile_complete = user.is_profile_complete(),
            "Profile updated"
        );
        Ok(user)
    }
}
