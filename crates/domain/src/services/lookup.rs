//! Two-stage public lookup.
//!
//! A shareable id is first resolved to its owner through the public index,
//! then the owner-scoped document is fetched. A miss at either stage, or an
//! index record without a usable owner, is reported as [`LookupError::NotFound`]
//! so callers cannot tell "does not exist" from "not public".

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, error};
use uuid::Uuid;

use crate::models::{InvitationRecord, PublicInvitation};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Invitation not found")]
    NotFound,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Stage one: shareable id to owner.
#[async_trait]
pub trait PublicIndex: Send + Sync {
    async fn public_record(&self, id: &str) -> Result<Option<PublicInvitation>, LookupError>;
}

/// Stage two: owner-scoped document fetch.
#[async_trait]
pub trait OwnerDocuments: Send + Sync {
    async fn owner_document(
        &self,
        owner_id: Uuid,
        id: &str,
    ) -> Result<Option<InvitationRecord>, LookupError>;
}

pub struct InvitationResolver<'a, I: ?Sized, D: ?Sized> {
    index: &'a I,
    documents: &'a D,
}

impl<'a, I, D> InvitationResolver<'a, I, D>
where
    I: PublicIndex + ?Sized,
    D: OwnerDocuments + ?Sized,
{
    pub fn new(index: &'a I, documents: &'a D) -> Self {
        Self { index, documents }
    }

    pub async fn resolve(&self, id: &str) -> Result<InvitationRecord, LookupError> {
        if !shared::crypto::is_valid_public_id(id) {
            debug!(invitation_id = %id, outcome = "malformed", "Public lookup miss");
            return Err(LookupError::NotFound);
        }

        let record = self.index.public_record(id).await.map_err(|e| log_failure(id, e))?;
        let Some(record) = record else {
            debug!(invitation_id = %id, outcome = "index_miss", "Public lookup miss");
            return Err(LookupError::NotFound);
        };

        let Some(owner_id) = record.owner() else {
            debug!(invitation_id = %id, outcome = "no_owner", "Public lookup miss");
            return Err(LookupError::NotFound);
        };

        let document = self
            .documents
            .owner_document(owner_id, id)
            .await
            .map_err(|e| log_failure(id, e))?;

        document.ok_or_else(|| {
            debug!(
                invitation_id = %id,
                owner_id = %owner_id,
                outcome = "document_miss",
                "Public lookup miss"
            );
            LookupError::NotFound
        })
    }
}

fn log_failure(id: &str, err: LookupError) -> LookupError {
    if err != LookupError::NotFound {
        error!(invitation_id = %id, error = %err, "Public lookup failed");
    }
    err
}

/// Memoizes one lookup for the lifetime of a single page view, so metadata
/// generation and body rendering share one storage round trip.
pub struct PageViewLookup<'a, I: ?Sized, D: ?Sized> {
    resolver: InvitationResolver<'a, I, D>,
    id: String,
    cell: OnceCell<Result<InvitationRecord, LookupError>>,
}

impl<'a, I, D> PageViewLookup<'a, I, D>
where
    I: PublicIndex + ?Sized,
    D: OwnerDocuments + ?Sized,
{
    pub fn new(resolver: InvitationResolver<'a, I, D>, id: impl Into<String>) -> Self {
        Self {
            resolver,
            id: id.into(),
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> &Result<InvitationRecord, LookupError> {
        self.cell
            .get_or_init(|| self.resolver.resolve(&self.id))
            .await
    }
}
