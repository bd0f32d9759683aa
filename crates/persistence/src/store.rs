//! Storage traits shared by the PostgreSQL repositories and the in-memory
//! stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::models::{InvitationData, InvitationRecord, NewUser, User};
use domain::services::lookup::{LookupError, OwnerDocuments, PublicIndex};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Stored document is invalid: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return StoreError::NotFound;
        }
        let code = err
            .as_database_error()
            .and_then(|e| e.code())
            .map(|c| c.into_owned());
        match code.as_deref() {
            Some("23505") => StoreError::Conflict("Resource already exists".into()),
            Some("42501") => StoreError::PermissionDenied(err.to_string()),
            _ => StoreError::Database(err),
        }
    }
}

impl From<StoreError> for LookupError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => LookupError::NotFound,
            StoreError::PermissionDenied(msg) => LookupError::PermissionDenied(msg),
            other => LookupError::Unavailable(other.to_string()),
        }
    }
}

/// Keyset position for listings ordered by `(updated_at DESC, id DESC)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub updated_at: DateTime<Utc>,
    pub id: String,
}

/// Owner-scoped invitation documents plus the public alias index.
///
/// Every write that creates or updates a document also writes its public
/// alias record; deletes remove both.
#[async_trait]
pub trait InvitationStore: PublicIndex + OwnerDocuments + Send + Sync {
    /// Inserts a new document. Fails with `Conflict` if `id` is taken by any
    /// owner.
    async fn create(
        &self,
        owner_id: Uuid,
        id: &str,
        data: &InvitationData,
    ) -> Result<InvitationRecord, StoreError>;

    async fn get(&self, owner_id: Uuid, id: &str) -> Result<Option<InvitationRecord>, StoreError>;

    /// Updates with document-store merge semantics: nested objects merge,
    /// arrays and scalars replace. Fails with `NotFound` if absent.
    async fn merge(
        &self,
        owner_id: Uuid,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<InvitationRecord, StoreError>;

    /// Replaces the whole document. Fails with `NotFound` if absent.
    async fn replace(
        &self,
        owner_id: Uuid,
        id: &str,
        data: &InvitationData,
    ) -> Result<InvitationRecord, StoreError>;

    async fn delete(&self, owner_id: Uuid, id: &str) -> Result<bool, StoreError>;

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        after: Option<&PageCursor>,
        limit: u32,
    ) -> Result<Vec<InvitationRecord>, StoreError>;

    async fn list_all(
        &self,
        after: Option<&PageCursor>,
        limit: u32,
    ) -> Result<Vec<InvitationRecord>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` on a duplicate email.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        phone: &str,
    ) -> Result<Option<User>, StoreError>;
}

/// Shape check applied before any document is written.
pub(crate) fn parse_document(value: serde_json::Value) -> Result<InvitationData, StoreError> {
    Ok(serde_json::from_value(value)?)
}

pub(crate) fn to_document(data: &InvitationData) -> Result<serde_json::Value, StoreError> {
    Ok(serde_json::to_value(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_lookup_error() {
        assert_eq!(LookupError::from(StoreError::NotFound), LookupError::NotFound);
        assert!(matches!(
            LookupError::from(StoreError::PermissionDenied("rls".into())),
            LookupError::PermissionDenied(_)
        ));
        assert!(matches!(
            LookupError::from(StoreError::Database(sqlx::Error::PoolTimedOut)),
            LookupError::Unavailable(_)
        ));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::NotFound
        ));
    }

    #[test]
    fn test_parse_document_rejects_wrong_shape() {
        assert!(parse_document(serde_json::json!({"schedule": "not a list"})).is_err());
        assert!(parse_document(serde_json::json!({})).is_ok());
    }
}
