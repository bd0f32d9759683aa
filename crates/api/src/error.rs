use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::{EditError, ExportError, LookupError, SinkKind, SuggestionError};
use persistence::StoreError;
use serde::Serialize;
use shared::jwt::JwtError;
use shared::pagination::CursorError;
use thiserror::Error;

/// Message shown when storage refuses a read the user is entitled to.
pub const RETRY_MESSAGE: &str = "Could not load the invitation. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Save already in progress")]
    SaveInProgress,

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An upstream collaborator (rasterizer, suggestion backend) failed.
    #[error("Bad gateway ({code}): {message}")]
    BadGateway {
        code: &'static str,
        title: Option<&'static str>,
        message: String,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Export failure carrying the sink-specific user message.
    pub fn export_failed(err: &ExportError, sink: SinkKind) -> Self {
        ApiError::BadGateway {
            code: "export_failed",
            title: None,
            message: err.user_message(sink).to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut title = None;
        let mut details = None;
        let (status, error_code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::SaveInProgress => (
                StatusCode::CONFLICT,
                "save_in_progress",
                "This invitation is already being saved. Please wait.".into(),
            ),
            ApiError::Validation {
                message,
                details: fields,
            } => {
                if !fields.is_empty() {
                    details = Some(fields);
                }
                (StatusCode::BAD_REQUEST, "validation_error", message)
            }
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            ApiError::BadGateway {
                code,
                title: t,
                message,
            } => {
                title = t.map(str::to_string);
                (StatusCode::BAD_GATEWAY, code, message)
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            title,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Invitation not found".into()),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::PermissionDenied(msg) => {
                tracing::error!(error = %msg, "Storage permission denied");
                ApiError::Internal(format!("Permission denied: {}", msg))
            }
            StoreError::InvalidDocument(e) => {
                ApiError::validation(format!("Invalid invitation document: {}", e))
            }
            StoreError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound => ApiError::NotFound("Invitation not found".into()),
            LookupError::PermissionDenied(msg) => {
                tracing::error!(error = %msg, "Invitation lookup denied by storage");
                ApiError::Internal(RETRY_MESSAGE.into())
            }
            LookupError::Unavailable(msg) => ApiError::ServiceUnavailable(format!(
                "{} ({})",
                RETRY_MESSAGE, msg
            )),
        }
    }
}

impl From<EditError> for ApiError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::UnknownCustomSection(id) => {
                ApiError::NotFound(format!("Custom section not found: {}", id))
            }
            other => ApiError::validation(other.to_string()),
        }
    }
}

impl From<SuggestionError> for ApiError {
    fn from(err: SuggestionError) -> Self {
        match err {
            SuggestionError::Disabled => {
                ApiError::ServiceUnavailable("AI suggestions are not enabled".into())
            }
            other => {
                let (title, message) = other.localized();
                ApiError::BadGateway {
                    code: "suggestion_failed",
                    title: Some(title),
                    message: message.to_string(),
                }
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => ApiError::Unauthorized("Token has expired".into()),
            JwtError::InvalidToken | JwtError::DecodingError(_) => {
                ApiError::Unauthorized("Invalid token".into())
            }
            other => ApiError::Internal(format!("Token error: {}", other)),
        }
    }
}

impl From<CursorError> for ApiError {
    fn from(err: CursorError) -> Self {
        ApiError::validation(format!("Invalid cursor: {}", err))
    }
}

impl From<shared::password::PasswordError> for ApiError {
    fn from(err: shared::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password hashing failed: {}", err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation { message, details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::services::CaptureError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::SaveInProgress, StatusCode::CONFLICT),
            (ApiError::validation("x"), StatusCode::BAD_REQUEST),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::ServiceUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_returned() {
        let response = ApiError::Internal("connection refused at 10.0.0.3".into()).into_response();
        let json = body_json(response).await;
        assert_eq!(json["error"], "internal_error");
        assert_eq!(json["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_suggestion_failure_is_localized_bad_gateway() {
        let error: ApiError = SuggestionError::Unreachable("timeout".into()).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"], "suggestion_failed");
        assert_eq!(json["title"], domain::services::suggestion::FAILURE_TITLE);
        assert_eq!(json["message"], domain::services::suggestion::FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_export_failure_uses_sink_message() {
        let err = ExportError::Exhausted {
            attempts: 2,
            last_error: CaptureError::Empty,
        };
        let response = ApiError::export_failed(&err, SinkKind::Share).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"], "export_failed");
        assert_eq!(
            json["message"],
            "Could not generate image. Please send the link manually."
        );
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(ApiError::from(StoreError::NotFound), ApiError::NotFound(_)));
        assert!(matches!(
            ApiError::from(StoreError::Conflict("taken".into())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(StoreError::PermissionDenied("rls".into())),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_edit_error_mapping() {
        let err = EditError::IndexOutOfRange {
            collection: "schedule",
            index: 9,
            len: 4,
        };
        assert!(matches!(ApiError::from(err), ApiError::Validation { .. }));
        assert!(matches!(
            ApiError::from(EditError::UnknownCustomSection("custom-1".into())),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_validation_details_are_returned() {
        use validator::Validate;

        #[derive(Validate)]
        struct Form {
            #[validate(length(min = 2, message = "Name is too short"))]
            name: String,
        }

        let errors = Form { name: "A".into() }.validate().unwrap_err();
        let response = ApiError::from(errors).into_response();
        let json = body_json(response).await;
        assert_eq!(json["message"], "Name is too short");
        assert_eq!(json["details"][0]["field"], "name");
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::Unauthorized("test".into()).to_string(),
            "Unauthorized: test"
        );
        assert_eq!(ApiError::validation("bad").to_string(), "Validation error: bad");
        assert_eq!(ApiError::RateLimited.to_string(), "Rate limited");
    }
}
