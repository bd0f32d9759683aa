//! Bearer-token extractors.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use shared::jwt::{extract_user_id, Role};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authenticated account from a valid access token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    pub role: Role,
    /// JWT ID, logged for session tracing.
    pub jti: String,
}

impl UserAuth {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(auth.clone());
        }

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

        let claims = state
            .jwt
            .validate_access_token(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;
        let user_id = extract_user_id(&claims)?;

        let auth = UserAuth {
            user_id,
            role: claims.role,
            jti: claims.jti,
        };
        parts.extensions.insert(auth.clone());
        Ok(auth)
    }
}

/// [`UserAuth`] restricted to administrators.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub UserAuth);

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = UserAuth::from_request_parts(parts, state).await?;
        if !auth.is_admin() {
            tracing::warn!(user_id = %auth.user_id, "Non-admin attempted admin route");
            return Err(ApiError::Forbidden("Administrator access required".to_string()));
        }
        Ok(AdminAuth(auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_is_admin() {
        let auth = UserAuth {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
            jti: "jti".to_string(),
        };
        assert!(auth.is_admin());
        assert!(!UserAuth {
            role: Role::User,
            ..auth
        }
        .is_admin());
    }
}
